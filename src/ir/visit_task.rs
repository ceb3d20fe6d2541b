//! Runs read-only visits of BIR nodes on a [`WorkerPool`].
//!
//! The module is shared through an [`Arc`] so that every job may outlive the
//! submitting stack frame. Mutating passes take the module back with
//! [`Arc::make_mut`] once [`WorkerPool::wait`] has returned.

use crate::{
    base::{IPoolJob, PoolRes, WorkerPool},
    ir::{Module, NodeID},
};
use std::sync::Arc;

/// A read-only operation applied to one node on a worker thread.
///
/// Results leave the job through whatever the operation captures, usually a
/// `Mutex` or a channel.
pub trait IVisitOp: Send + Sync + 'static {
    fn run(&self, module: &Module, node: NodeID);
}

impl<F> IVisitOp for F
where
    F: Fn(&Module, NodeID) + Send + Sync + 'static,
{
    fn run(&self, module: &Module, node: NodeID) {
        self(module, node)
    }
}

pub struct VisitTask {
    pub module: Arc<Module>,
    pub node: NodeID,
    pub op: Arc<dyn IVisitOp>,
}

impl IPoolJob for VisitTask {
    fn execute(self: Box<Self>) {
        let VisitTask { module, node, op } = *self;
        if !module.is_alive(node) {
            log::warn!("visit task: node {node:?} is not live in the module, skipped");
            return;
        }
        op.run(&module, node);
    }
}

/// Queues one [`VisitTask`] applying `op` to `node`.
pub fn submit_visit(
    pool: &WorkerPool,
    module: &Arc<Module>,
    node: NodeID,
    op: Arc<dyn IVisitOp>,
) -> PoolRes {
    pool.submit(VisitTask { module: module.clone(), node, op })
}
