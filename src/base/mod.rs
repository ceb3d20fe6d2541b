mod slabid;
mod task_queue;
mod worker;

pub use self::{
    slabid::ISlabID,
    task_queue::TaskQueue,
    worker::{IPoolJob, PoolError, PoolOption, PoolRes, WorkerPool},
};

pub trait INullableValue: Clone + Eq {
    fn new_null() -> Self;
    fn is_null(&self) -> bool;

    fn is_nonnull(&self) -> bool {
        !self.is_null()
    }
    fn from_option(opt: Option<Self>) -> Self {
        opt.unwrap_or_else(Self::new_null)
    }
    fn to_option(&self) -> Option<Self> {
        if self.is_null() { None } else { Some(self.clone()) }
    }
}
