use crate::{
    ir::{
        FuncID, IOrderedObserver, Module, NodeID, OrderedAllVisitor, StmtData, StmtID, StmtKind,
        VarID,
    },
    opt::{IModulePass, PassRes},
};
use std::collections::HashSet;

#[derive(Default)]
struct DefinedVars(HashSet<VarID>);

impl IOrderedObserver for DefinedVars {
    fn on_stmt(&mut self, _: &Module, _: StmtID, data: &StmtData) {
        if let StmtKind::VarDef { var, .. } = data.kind {
            self.0.insert(var);
        }
    }
}

/// Sorts the locals of every function definition by name and gives each local
/// without a reachable `VarDef` one at the front of the body.
///
/// Generated definitions have no initializer and appear in name order.
#[derive(Debug, Default)]
pub struct VarDefGenerator {
    /// Number of `VarDef` statements generated by the last run.
    pub generated: usize,
}

impl VarDefGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn sort_locals(module: &mut Module, func: FuncID) -> Vec<VarID> {
        let mut locals = func.deref_ir(&module.allocs).locals.clone();
        let allocs = &module.allocs;
        locals.sort_by(|a, b| {
            let (na, nb) = (&a.deref_ir(allocs).name, &b.deref_ir(allocs).name);
            na.cmp(nb).then(a.cmp(b))
        });
        func.deref_ir_mut(&mut module.allocs).locals = locals.clone();
        locals
    }

    fn generate_for_func(&mut self, module: &mut Module, func: FuncID) -> PassRes {
        let locals = Self::sort_locals(module, func);

        let mut visitor = OrderedAllVisitor::with_observer(DefinedVars::default(), true, true);
        visitor.run(module, NodeID::Func(func))?;
        let defined = visitor.into_observer().0;

        let params = func.deref_ir(&module.allocs).params.clone();
        let missing: Vec<VarID> = locals
            .into_iter()
            .filter(|v| !defined.contains(v) && !params.contains(v))
            .collect();
        // prepending in reverse keeps the generated definitions in name order
        for &var in missing.iter().rev() {
            let def = module.new_stmt(StmtKind::VarDef { var, init: None });
            module.prepend_stmt(func, def)?;
        }
        if !missing.is_empty() {
            log::debug!(
                "var-defs: {} definitions generated in `{}`",
                missing.len(),
                func.deref_ir(&module.allocs).name
            );
        }
        self.generated += missing.len();
        Ok(())
    }
}

impl IModulePass for VarDefGenerator {
    fn get_name(&self) -> &'static str {
        "VarDefGenerator"
    }

    fn run_on_module(&mut self, module: &mut Module) -> PassRes {
        self.generated = 0;
        let funcs: Vec<FuncID> = module.func_definitions().collect();
        for func in funcs {
            self.generate_for_func(module, func)?;
        }
        Ok(())
    }
}
