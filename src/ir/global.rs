use crate::ir::{ExprID, StmtID, TypeID, VarID};
use smallvec::SmallVec;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarData {
    pub name: SmolStr,
    pub ty: TypeID,
    pub is_global: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncData {
    pub name: SmolStr,
    pub ret_ty: TypeID,
    pub params: SmallVec<[VarID; 4]>,
    pub locals: Vec<VarID>,
    /// `None` for a declaration.
    pub body: Option<StmtID>,
    pub vararg: bool,
}

impl FuncData {
    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }
    pub fn is_declaration(&self) -> bool {
        self.body.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalVarDef {
    pub var: VarID,
    pub init: Option<ExprID>,
}
