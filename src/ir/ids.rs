use crate::{
    base::ISlabID,
    impl_slab_id,
    ir::{ExprData, FuncData, IRAllocs, StmtData, TypeData, VarData},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StmtID(u32);
impl_slab_id!(StmtID, StmtData);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprID(u32);
impl_slab_id!(ExprID, ExprData);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeID(u32);
impl_slab_id!(TypeID, TypeData);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarID(u32);
impl_slab_id!(VarID, VarData);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncID(u32);
impl_slab_id!(FuncID, FuncData);

impl StmtID {
    pub fn deref_ir(self, allocs: &IRAllocs) -> &StmtData {
        self.deref(&allocs.stmts)
    }
    pub fn deref_ir_mut(self, allocs: &mut IRAllocs) -> &mut StmtData {
        self.deref_mut(&mut allocs.stmts)
    }
}
impl ExprID {
    pub fn deref_ir(self, allocs: &IRAllocs) -> &ExprData {
        self.deref(&allocs.exprs)
    }
}
impl TypeID {
    pub fn deref_ir(self, allocs: &IRAllocs) -> &TypeData {
        self.deref(&allocs.types)
    }
    pub fn deref_ir_mut(self, allocs: &mut IRAllocs) -> &mut TypeData {
        self.deref_mut(&mut allocs.types)
    }
}
impl VarID {
    pub fn deref_ir(self, allocs: &IRAllocs) -> &VarData {
        self.deref(&allocs.vars)
    }
    pub fn deref_ir_mut(self, allocs: &mut IRAllocs) -> &mut VarData {
        self.deref_mut(&mut allocs.vars)
    }
}
impl FuncID {
    pub fn deref_ir(self, allocs: &IRAllocs) -> &FuncData {
        self.deref(&allocs.funcs)
    }
    pub fn deref_ir_mut(self, allocs: &mut IRAllocs) -> &mut FuncData {
        self.deref_mut(&mut allocs.funcs)
    }
}

/// Any node of the BIR graph.
///
/// A global variable definition is identified by its variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeID {
    Stmt(StmtID),
    Expr(ExprID),
    Type(TypeID),
    Var(VarID),
    Func(FuncID),
    GlobalVar(VarID),
}

impl From<StmtID> for NodeID {
    fn from(id: StmtID) -> Self {
        NodeID::Stmt(id)
    }
}
impl From<ExprID> for NodeID {
    fn from(id: ExprID) -> Self {
        NodeID::Expr(id)
    }
}
impl From<TypeID> for NodeID {
    fn from(id: TypeID) -> Self {
        NodeID::Type(id)
    }
}
impl From<VarID> for NodeID {
    fn from(id: VarID) -> Self {
        NodeID::Var(id)
    }
}
impl From<FuncID> for NodeID {
    fn from(id: FuncID) -> Self {
        NodeID::Func(id)
    }
}
