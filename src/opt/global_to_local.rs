//! Demotes global variables to locals of the functions that use them.
//!
//! The pass is aggressive: it does not check whether the value of the global
//! must survive between calls. Globals carrying a name from debug information
//! are kept, since they are likely real globals of the decompiled program.

use crate::{
    base::WorkerPool,
    ir::{FuncID, IVisitOp, Module, NodeID, StmtKind, VarID, submit_visit},
    opt::{FuncVarUses, PassError, PassRes},
};
use parking_lot::Mutex;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

type UsedGlobals = HashMap<FuncID, HashSet<VarID>>;

#[derive(Debug, Default)]
pub struct AggressiveGlobalToLocal {
    /// `(global, function)` pairs demoted by the last run, in demotion order.
    pub converted: Vec<(VarID, FuncID)>,
}

impl AggressiveGlobalToLocal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes every function definition on `pool`, then rewrites `module` on
    /// the calling thread. Returns the number of demotions.
    ///
    /// The use analysis only reads the module, one pool task per function.
    /// Rewriting starts after [`WorkerPool::wait`], when every task has
    /// released its share of `module`.
    pub fn run(&mut self, module: &mut Arc<Module>, pool: &WorkerPool) -> PassRes<usize> {
        self.converted.clear();
        let candidates: HashSet<VarID> = module
            .global_vars()
            .iter()
            .map(|g| g.var)
            .filter(|&v| !module.has_debug_name(v))
            .collect();
        if candidates.is_empty() {
            return Ok(0);
        }
        let funcs: Vec<FuncID> = module.func_definitions().collect();
        let used = Self::analyze_uses(module, pool, &funcs, Arc::new(candidates))?;

        let globals_order: Vec<VarID> = module.global_vars().iter().map(|g| g.var).collect();
        let module = Arc::make_mut(module);
        for &func in &funcs {
            let func_used = &used[&func];
            for &var in globals_order.iter().filter(|v| func_used.contains(*v)) {
                self.convert_in_func(module, var, func)?;
            }
        }
        Ok(self.converted.len())
    }

    fn analyze_uses(
        module: &Arc<Module>,
        pool: &WorkerPool,
        funcs: &[FuncID],
        candidates: Arc<HashSet<VarID>>,
    ) -> PassRes<UsedGlobals> {
        let results: Arc<Mutex<UsedGlobals>> = Arc::default();
        let sink = results.clone();
        let op: Arc<dyn IVisitOp> = Arc::new(move |module: &Module, node: NodeID| {
            let NodeID::Func(func) = node else {
                return;
            };
            match FuncVarUses::analyze(module, func) {
                Ok(uses) => {
                    let used = uses.used_vars().filter(|v| candidates.contains(v)).collect();
                    sink.lock().insert(func, used);
                }
                Err(e) => log::error!("global-to-local: use analysis of {func:?} failed: {e}"),
            }
        });
        for &func in funcs {
            submit_visit(pool, module, NodeID::Func(func), op.clone())?;
        }
        pool.wait();

        let results = std::mem::take(&mut *results.lock());
        if results.len() != funcs.len() {
            return Err(PassError::Incomplete { done: results.len(), total: funcs.len() });
        }
        Ok(results)
    }

    fn convert_in_func(&mut self, module: &mut Module, var: VarID, func: FuncID) -> PassRes {
        // A global used by several functions keeps its initializer only in the
        // first one: the definition is gone by the time the others are reached.
        let init = module.init_of_global(var);
        let def = module.new_stmt(StmtKind::VarDef { var, init });
        module.prepend_stmt(func, def)?;
        module.add_local(func, var);
        if module.global_def(var).is_some() {
            module.remove_global_var(var)?;
        }
        log::debug!(
            "global-to-local: `{}` demoted into `{}`",
            var.deref_ir(&module.allocs).name,
            func.deref_ir(&module.allocs).name,
        );
        self.converted.push((var, func));
        Ok(())
    }
}
