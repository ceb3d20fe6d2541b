use crate::{
    base::ISlabID,
    ir::{
        BinaryOp, ExprData, ExprID, FuncData, FuncID, GlobalVarDef, IRError, IRRes, NodeID,
        StmtData, StmtID, StmtKind, TypeData, TypeID, VarData, VarID,
    },
};
use slab::Slab;
use smallvec::SmallVec;
use smol_str::{SmolStr, format_smolstr};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct IRAllocs {
    pub stmts: Slab<StmtData>,
    pub exprs: Slab<ExprData>,
    pub types: Slab<TypeData>,
    pub vars: Slab<VarData>,
    pub funcs: Slab<FuncData>,
}

impl IRAllocs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(base_capacity: usize) -> Self {
        Self {
            stmts: Slab::with_capacity(base_capacity * 4),
            exprs: Slab::with_capacity(base_capacity * 8),
            types: Slab::with_capacity(base_capacity),
            vars: Slab::with_capacity(base_capacity * 2),
            funcs: Slab::with_capacity(base_capacity / 4 + 1),
        }
    }
}

/// A BIR module: owns every node through its arenas.
///
/// Nodes reference each other by handle only, so sharing a type between many
/// variables or jumping back to an earlier statement never creates an
/// ownership cycle. The graph is read-only while a traversal runs; passes
/// mutate it between traversals through `&mut Module`.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: SmolStr,
    pub allocs: IRAllocs,
    globals: Vec<GlobalVarDef>,
    funcs: Vec<FuncID>,
    debug_names: HashMap<VarID, SmolStr>,
}

impl Module {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            allocs: IRAllocs::new(),
            globals: Vec::new(),
            funcs: Vec::new(),
            debug_names: HashMap::new(),
        }
    }

    // ----------------------------[ types ]----------------------------

    pub fn new_type(&mut self, ty: TypeData) -> TypeID {
        TypeID::alloc(&mut self.allocs.types, ty)
    }
    pub fn void_type(&mut self) -> TypeID {
        self.new_type(TypeData::Void)
    }
    pub fn int_type(&mut self, bits: u32, unsigned: bool) -> TypeID {
        self.new_type(TypeData::Int { bits, unsigned })
    }
    pub fn ptr_type(&mut self, pointee: TypeID) -> TypeID {
        self.new_type(TypeData::Pointer(pointee))
    }
    pub fn array_type(&mut self, elem: TypeID, dims: &[usize]) -> TypeID {
        self.new_type(TypeData::Array { elem, dims: SmallVec::from_slice(dims) })
    }
    /// Creates a struct with no elements yet; see [`Module::set_struct_elems`].
    pub fn opaque_struct_type(&mut self, name: Option<&str>) -> TypeID {
        self.new_type(TypeData::Struct { name: name.map(SmolStr::new), elems: Vec::new() })
    }
    pub fn set_struct_elems(&mut self, sty: TypeID, new_elems: Vec<TypeID>) -> IRRes {
        match self.allocs.types.get_mut(sty.into_handle() as usize) {
            Some(TypeData::Struct { elems, .. }) => {
                *elems = new_elems;
                Ok(())
            }
            Some(_) => Err(IRError::NotAStruct(sty)),
            None => Err(IRError::DeadNode(NodeID::Type(sty))),
        }
    }
    pub fn func_type(&mut self, ret: TypeID, params: &[TypeID], vararg: bool) -> TypeID {
        self.new_type(TypeData::Func { ret, params: SmallVec::from_slice(params), vararg })
    }

    // ----------------------------[ expressions ]----------------------------

    pub fn new_expr(&mut self, expr: ExprData) -> ExprID {
        ExprID::alloc(&mut self.allocs.exprs, expr)
    }
    pub fn var_expr(&mut self, var: VarID) -> ExprID {
        self.new_expr(ExprData::Var(var))
    }
    pub fn const_int(&mut self, value: i128, bits: u32) -> ExprID {
        self.new_expr(ExprData::ConstInt { value, bits, unsigned: false })
    }
    pub fn binary_expr(&mut self, op: BinaryOp, lhs: ExprID, rhs: ExprID) -> ExprID {
        self.new_expr(ExprData::Binary(op, lhs, rhs))
    }

    // ----------------------------[ statements ]----------------------------

    pub fn new_stmt(&mut self, kind: StmtKind) -> StmtID {
        StmtID::alloc(&mut self.allocs.stmts, StmtData::new(kind))
    }
    pub fn set_succ(&mut self, stmt: StmtID, succ: Option<StmtID>) {
        stmt.deref_ir_mut(&mut self.allocs).succ = succ;
    }
    pub fn set_label(&mut self, stmt: StmtID, label: impl Into<SmolStr>) {
        stmt.deref_ir_mut(&mut self.allocs).label = Some(label.into());
    }
    /// Links `stmts` into one successor chain and returns its head.
    pub fn chain_stmts(&mut self, stmts: &[StmtID]) -> Option<StmtID> {
        for pair in stmts.windows(2) {
            self.set_succ(pair[0], Some(pair[1]));
        }
        stmts.first().copied()
    }

    /// Label of `stmt`, or a name derived from its handle when it has none.
    pub fn stmt_label(&self, stmt: StmtID) -> SmolStr {
        match &stmt.deref_ir(&self.allocs).label {
            Some(label) => label.clone(),
            None => format_smolstr!("label_{}", stmt.into_handle()),
        }
    }

    // ----------------------------[ variables & functions ]----------------------------

    pub fn new_var(&mut self, name: impl Into<SmolStr>, ty: TypeID) -> VarID {
        VarID::alloc(&mut self.allocs.vars, VarData { name: name.into(), ty, is_global: false })
    }

    pub fn add_global_var(&mut self, var: VarID, init: Option<ExprID>) {
        var.deref_ir_mut(&mut self.allocs).is_global = true;
        match self.globals.iter_mut().find(|g| g.var == var) {
            Some(def) => def.init = init,
            None => self.globals.push(GlobalVarDef { var, init }),
        }
    }
    pub fn remove_global_var(&mut self, var: VarID) -> IRRes<GlobalVarDef> {
        let Some(pos) = self.globals.iter().position(|g| g.var == var) else {
            return Err(IRError::GlobalNotFound(var));
        };
        let def = self.globals.remove(pos);
        if let Some(data) = self.allocs.vars.get_mut(var.into_handle() as usize) {
            data.is_global = false;
        }
        self.debug_names.remove(&var);
        Ok(def)
    }
    pub fn global_vars(&self) -> &[GlobalVarDef] {
        &self.globals
    }
    pub fn global_def(&self, var: VarID) -> Option<&GlobalVarDef> {
        self.globals.iter().find(|g| g.var == var)
    }
    pub fn init_of_global(&self, var: VarID) -> Option<ExprID> {
        self.global_def(var).and_then(|g| g.init)
    }

    pub fn set_debug_name(&mut self, var: VarID, name: impl Into<SmolStr>) {
        self.debug_names.insert(var, name.into());
    }
    pub fn has_debug_name(&self, var: VarID) -> bool {
        self.debug_names.contains_key(&var)
    }

    pub fn add_func(
        &mut self,
        name: impl Into<SmolStr>,
        ret_ty: TypeID,
        params: &[VarID],
        body: Option<StmtID>,
    ) -> FuncID {
        let func = FuncID::alloc(
            &mut self.allocs.funcs,
            FuncData {
                name: name.into(),
                ret_ty,
                params: SmallVec::from_slice(params),
                locals: Vec::new(),
                body,
                vararg: false,
            },
        );
        self.funcs.push(func);
        func
    }
    pub fn funcs(&self) -> &[FuncID] {
        &self.funcs
    }
    pub fn func_definitions(&self) -> impl Iterator<Item = FuncID> + '_ {
        self.funcs
            .iter()
            .copied()
            .filter(|f| f.deref_ir(&self.allocs).is_definition())
    }
    pub fn set_func_body(&mut self, func: FuncID, body: Option<StmtID>) {
        func.deref_ir_mut(&mut self.allocs).body = body;
    }
    pub fn add_local(&mut self, func: FuncID, var: VarID) {
        let locals = &mut func.deref_ir_mut(&mut self.allocs).locals;
        if !locals.contains(&var) {
            locals.push(var);
        }
    }

    /// Makes `stmt` the first statement of `func`, followed by the old body.
    pub fn prepend_stmt(&mut self, func: FuncID, stmt: StmtID) -> IRRes {
        let Some(fdata) = self.allocs.funcs.get(func.into_handle() as usize) else {
            return Err(IRError::DeadNode(NodeID::Func(func)));
        };
        let Some(old_body) = fdata.body else {
            return Err(IRError::NotAFunctionDef(func));
        };
        self.set_succ(stmt, Some(old_body));
        self.set_func_body(func, Some(stmt));
        Ok(())
    }

    // ----------------------------[ liveness ]----------------------------

    pub fn is_alive(&self, node: NodeID) -> bool {
        let allocs = &self.allocs;
        match node {
            NodeID::Stmt(s) => s.is_alive(&allocs.stmts),
            NodeID::Expr(e) => e.is_alive(&allocs.exprs),
            NodeID::Type(t) => t.is_alive(&allocs.types),
            NodeID::Var(v) => v.is_alive(&allocs.vars),
            NodeID::Func(f) => f.is_alive(&allocs.funcs),
            NodeID::GlobalVar(v) => v.is_alive(&allocs.vars) && self.global_def(v).is_some(),
        }
    }
    pub fn check_alive(&self, node: NodeID) -> IRRes {
        if self.is_alive(node) { Ok(()) } else { Err(IRError::DeadNode(node)) }
    }
}
