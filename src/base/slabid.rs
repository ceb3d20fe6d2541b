use super::INullableValue;
use slab::Slab;

/// Handle into one of the IR arenas. Handles are plain indices, so cycles in
/// the IR graph are just index equality.
pub trait ISlabID: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    type RefObject: Sized;

    fn from_handle(handle: u32) -> Self;
    fn into_handle(self) -> u32;

    fn try_deref<'slab>(self, slab: &'slab Slab<Self::RefObject>) -> Option<&'slab Self::RefObject> {
        slab.get(self.into_handle() as usize)
    }
    fn try_deref_mut<'slab>(
        self,
        slab: &'slab mut Slab<Self::RefObject>,
    ) -> Option<&'slab mut Self::RefObject> {
        slab.get_mut(self.into_handle() as usize)
    }

    fn deref<'slab>(self, slab: &'slab Slab<Self::RefObject>) -> &'slab Self::RefObject {
        match self.try_deref(slab) {
            Some(obj) => obj,
            None => panic!("Tried to deref dead handle {self:?} (use after free?)"),
        }
    }
    fn deref_mut<'slab>(self, slab: &'slab mut Slab<Self::RefObject>) -> &'slab mut Self::RefObject {
        match self.try_deref_mut(slab) {
            Some(obj) => obj,
            None => panic!("Tried to deref dead handle {self:?} (use after free?)"),
        }
    }

    fn is_alive(self, slab: &Slab<Self::RefObject>) -> bool {
        slab.contains(self.into_handle() as usize)
    }

    fn alloc(slab: &mut Slab<Self::RefObject>, obj: Self::RefObject) -> Self {
        let handle = slab.insert(obj);
        assert!(handle < u32::MAX as usize, "IR arena exhausted");
        Self::from_handle(handle as u32)
    }
}

impl<T: ISlabID> INullableValue for T {
    fn new_null() -> Self {
        T::from_handle(u32::MAX)
    }

    fn is_null(&self) -> bool {
        self.into_handle() == u32::MAX
    }
}

#[macro_export]
macro_rules! impl_slab_id {
    ($id_type:ident, $data_type:ty) => {
        impl $crate::base::ISlabID for $id_type {
            type RefObject = $data_type;

            fn from_handle(handle: u32) -> Self {
                Self(handle)
            }
            fn into_handle(self) -> u32 {
                self.0
            }
        }
    };
}
