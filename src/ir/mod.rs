mod expr;
mod global;
mod ids;
mod module;
mod ordered;
mod stmt;
mod text_repr;
mod types;
mod visit_task;
mod visitor;

pub use self::{
    expr::{BinaryOp, CastKind, ExprData, UnaryOp},
    global::{FuncData, GlobalVarDef, VarData},
    ids::{ExprID, FuncID, NodeID, StmtID, TypeID, VarID},
    module::{IRAllocs, Module},
    ordered::{IOrderedObserver, OrderedAllVisitor, VisitLog, VisitPolicy},
    stmt::{StmtData, StmtKind},
    text_repr::{ValueTextRepr, text_repr},
    types::TypeData,
    visit_task::{IVisitOp, VisitTask, submit_visit},
    visitor::IIRVisitor,
};

#[derive(Debug, Clone, thiserror::Error)]
pub enum IRError {
    #[error("node {0:?} is dead or was never allocated")]
    DeadNode(NodeID),

    #[error("type {0:?} is not a struct type")]
    NotAStruct(TypeID),

    #[error("function {0:?} is a declaration, not a definition")]
    NotAFunctionDef(FuncID),

    #[error("variable {0:?} has no global definition in this module")]
    GlobalNotFound(VarID),
}
pub type IRRes<T = ()> = Result<T, IRError>;
