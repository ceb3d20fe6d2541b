use crate::ir::{ExprID, StmtID, VarID};
use smallvec::SmallVec;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    Assign { lhs: ExprID, rhs: ExprID },
    VarDef { var: VarID, init: Option<ExprID> },
    Call(ExprID),
    Return(Option<ExprID>),
    Empty,
    /// `(condition, body)` for the `if` clause followed by every `elif`.
    If { clauses: SmallVec<[(ExprID, StmtID); 2]>, else_clause: Option<StmtID> },
    /// A clause without an expression is the `default` clause.
    Switch { control: ExprID, clauses: SmallVec<[(Option<ExprID>, StmtID); 4]> },
    While { cond: ExprID, body: StmtID },
    For { ind_var: VarID, start: ExprID, end_cond: ExprID, step: ExprID, body: StmtID },
    UFor { init: Option<ExprID>, cond: Option<ExprID>, step: Option<ExprID>, body: StmtID },
    Break,
    Continue,
    Goto { target: StmtID },
    Unreachable,
}

impl StmtKind {
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            StmtKind::If { .. }
                | StmtKind::Switch { .. }
                | StmtKind::While { .. }
                | StmtKind::For { .. }
                | StmtKind::UFor { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StmtData {
    pub kind: StmtKind,
    /// Next statement in control flow.
    pub succ: Option<StmtID>,
    /// Label used by `goto` statements jumping here.
    pub label: Option<SmolStr>,
}

impl StmtData {
    pub fn new(kind: StmtKind) -> Self {
        Self { kind, succ: None, label: None }
    }
}
