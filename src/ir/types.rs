use crate::ir::TypeID;
use smallvec::SmallVec;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeData {
    Void,
    Unknown,
    String,
    Int { bits: u32, unsigned: bool },
    Float { bits: u32 },
    Pointer(TypeID),
    Array { elem: TypeID, dims: SmallVec<[usize; 2]> },
    /// Element list may be filled in after creation, so a struct can point to itself.
    Struct { name: Option<SmolStr>, elems: Vec<TypeID> },
    Func { ret: TypeID, params: SmallVec<[TypeID; 4]>, vararg: bool },
}

impl TypeData {
    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeData::Pointer(_))
    }

    /// Structural children in declaration order.
    pub fn children(&self) -> SmallVec<[TypeID; 4]> {
        match self {
            TypeData::Void
            | TypeData::Unknown
            | TypeData::String
            | TypeData::Int { .. }
            | TypeData::Float { .. } => SmallVec::new(),
            TypeData::Pointer(pointee) => smallvec::smallvec![*pointee],
            TypeData::Array { elem, .. } => smallvec::smallvec![*elem],
            TypeData::Struct { elems, .. } => elems.iter().copied().collect(),
            TypeData::Func { ret, params, .. } => {
                let mut list: SmallVec<[TypeID; 4]> = smallvec::smallvec![*ret];
                list.extend(params.iter().copied());
                list
            }
        }
    }
}
