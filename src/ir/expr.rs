use crate::ir::{ExprID, TypeID, VarID};
use smallvec::SmallVec;
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    AddressOf,
    Deref,
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Assign,
    ArrayIndex,
    StructIndex,
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Comma,
}

impl BinaryOp {
    /// Infix operator text. Index operators are not infix and return `None`.
    pub fn infix_symbol(self) -> Option<&'static str> {
        use BinaryOp::*;
        let s = match self {
            ArrayIndex | StructIndex => return None,
            Assign => "=",
            Eq => "==",
            Neq => "!=",
            Lt => "<",
            Gt => ">",
            LtEq => "<=",
            GtEq => ">=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            And => "and",
            Or => "or",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            Shl => "<<",
            Shr => ">>",
            Comma => ",",
        };
        Some(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastKind {
    BitCast,
    Ext,
    Trunc,
    FPToInt,
    IntToFP,
    IntToPtr,
    PtrToInt,
}

impl CastKind {
    pub fn get_name(self) -> &'static str {
        match self {
            CastKind::BitCast => "BitCastExpr",
            CastKind::Ext => "ExtCastExpr",
            CastKind::Trunc => "TruncCastExpr",
            CastKind::FPToInt => "FPToIntCastExpr",
            CastKind::IntToFP => "IntToFPCastExpr",
            CastKind::IntToPtr => "IntToPtrCastExpr",
            CastKind::PtrToInt => "PtrToIntCastExpr",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprData {
    Var(VarID),

    ConstInt { value: i128, bits: u32, unsigned: bool },
    ConstFloat(f64),
    ConstBool(bool),
    ConstNullPtr,
    ConstString(SmolStr),
    /// `elems == None` is an uninitialized array of type `ty`.
    ConstArray { ty: TypeID, elems: Option<Vec<ExprID>> },
    /// `(field, value)` pairs.
    ConstStruct(Vec<(ExprID, ExprID)>),
    ConstSymbol { name: SmolStr, value: ExprID },

    Unary(UnaryOp, ExprID),
    Binary(BinaryOp, ExprID, ExprID),
    Ternary { cond: ExprID, then: ExprID, other: ExprID },
    Call { callee: ExprID, args: SmallVec<[ExprID; 4]> },
    Cast { kind: CastKind, ty: TypeID, operand: ExprID },
}

impl ExprData {
    pub fn as_var(&self) -> Option<VarID> {
        match self {
            ExprData::Var(v) => Some(*v),
            _ => None,
        }
    }
    pub fn as_int(&self) -> Option<i128> {
        match self {
            ExprData::ConstInt { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Direct sub-expressions in evaluation order.
    pub fn operands(&self) -> SmallVec<[ExprID; 4]> {
        match self {
            ExprData::Var(_)
            | ExprData::ConstInt { .. }
            | ExprData::ConstFloat(_)
            | ExprData::ConstBool(_)
            | ExprData::ConstNullPtr
            | ExprData::ConstString(_) => SmallVec::new(),
            ExprData::ConstArray { elems, .. } => {
                elems.iter().flatten().copied().collect()
            }
            ExprData::ConstStruct(members) => {
                members.iter().flat_map(|&(f, v)| [f, v]).collect()
            }
            ExprData::ConstSymbol { value, .. } => smallvec::smallvec![*value],
            ExprData::Unary(_, x) => smallvec::smallvec![*x],
            ExprData::Binary(_, lhs, rhs) => smallvec::smallvec![*lhs, *rhs],
            ExprData::Ternary { cond, then, other } => smallvec::smallvec![*cond, *then, *other],
            ExprData::Call { callee, args } => {
                let mut ret: SmallVec<[ExprID; 4]> = smallvec::smallvec![*callee];
                ret.extend(args.iter().copied());
                ret
            }
            ExprData::Cast { operand, .. } => smallvec::smallvec![*operand],
        }
    }
}
