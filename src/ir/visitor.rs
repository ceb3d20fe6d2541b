use crate::ir::{
    ExprData, ExprID, FuncData, FuncID, GlobalVarDef, Module, NodeID, StmtData, StmtID, TypeData,
    TypeID, VarData, VarID,
};

/// A visitor over every BIR node family.
///
/// Each handler receives the handle and the concretely typed node data, and
/// matches on the data enum to pick the per-kind behavior. Adding a node kind
/// to one of the enums makes every visitor fail to compile until it handles
/// the new kind.
pub trait IIRVisitor {
    fn visit_global_var(&mut self, module: &Module, def: &GlobalVarDef);
    fn visit_func(&mut self, module: &Module, func: FuncID, data: &FuncData);
    fn visit_var(&mut self, module: &Module, var: VarID, data: &VarData);
    fn visit_stmt(&mut self, module: &Module, stmt: StmtID, data: &StmtData);
    fn visit_expr(&mut self, module: &Module, expr: ExprID, data: &ExprData);
    fn visit_type(&mut self, module: &Module, ty: TypeID, data: &TypeData);

    /// Resolves `node` and calls the matching handler.
    ///
    /// # Panics
    ///
    /// If `node` is dead. Check the root with [`Module::check_alive`] first.
    fn dispatch(&mut self, module: &Module, node: NodeID) {
        let allocs = &module.allocs;
        match node {
            NodeID::Stmt(s) => self.visit_stmt(module, s, s.deref_ir(allocs)),
            NodeID::Expr(e) => self.visit_expr(module, e, e.deref_ir(allocs)),
            NodeID::Type(t) => self.visit_type(module, t, t.deref_ir(allocs)),
            NodeID::Var(v) => self.visit_var(module, v, v.deref_ir(allocs)),
            NodeID::Func(f) => self.visit_func(module, f, f.deref_ir(allocs)),
            NodeID::GlobalVar(v) => match module.global_def(v) {
                Some(def) => self.visit_global_var(module, def),
                None => panic!("variable {v:?} has no global definition"),
            },
        }
    }
}

impl NodeID {
    /// Double dispatch entry: hands this node to the visitor's typed handler.
    pub fn accept<V: IIRVisitor + ?Sized>(self, module: &Module, visitor: &mut V) {
        visitor.dispatch(module, self)
    }
}
