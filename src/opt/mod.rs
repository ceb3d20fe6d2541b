//! Analyses and transforms built on the ordered traversal.

use crate::{
    base::PoolError,
    ir::{IRError, Module},
};

mod global_to_local;
mod ident_fixup;
mod var_defs;
mod var_uses;

pub use self::{
    global_to_local::AggressiveGlobalToLocal,
    ident_fixup::{IdentFixup, make_ident_valid},
    var_defs::VarDefGenerator,
    var_uses::{FuncVarUses, VarUses},
};

#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("worker pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("IR error: {0}")]
    IR(#[from] IRError),

    #[error("analysis finished for {done} of {total} functions")]
    Incomplete { done: usize, total: usize },
}
pub type PassRes<T = ()> = Result<T, PassError>;

/// A transform that runs on the calling thread with exclusive access to the
/// module.
pub trait IModulePass {
    fn get_name(&self) -> &'static str;
    fn run_on_module(&mut self, module: &mut Module) -> PassRes;
}
