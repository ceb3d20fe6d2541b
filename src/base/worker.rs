//! Fixed-size thread pool that drains a shared [`TaskQueue`] of jobs.
//!
//! The pool tracks global quiescence: it is `completed` exactly when the queue
//! is empty and every worker is idle. Two ways to stop it exist:
//!
//! - [`WorkerPool::hard_stop`] discards queued jobs, wakes every worker and
//!   joins them. The pool is unusable afterwards.
//! - [`WorkerPool::wait`] blocks until every submitted job has finished; the
//!   workers stay alive and new jobs may be submitted afterwards.

use super::TaskQueue;
use parking_lot::{Condvar, Mutex, MutexGuard};
use smol_str::SmolStr;
use std::{
    num::NonZeroUsize,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    thread::{self, JoinHandle},
};

/// A unit of work executed by exactly one worker thread.
pub trait IPoolJob: Send + 'static {
    fn execute(self: Box<Self>);
}

impl<F: FnOnce() + Send + 'static> IPoolJob for F {
    fn execute(self: Box<Self>) {
        (*self)()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("worker pool has been stopped and accepts no more jobs")]
    Stopped,

    #[error("failed to spawn worker thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}
pub type PoolRes<T = ()> = Result<T, PoolError>;

#[derive(Debug, Clone)]
pub struct PoolOption {
    /// Number of worker threads. `None` means the available hardware parallelism.
    pub threads: Option<usize>,
    pub thread_name: SmolStr,
}

impl Default for PoolOption {
    fn default() -> Self {
        Self { threads: None, thread_name: SmolStr::new_static("bir-visit") }
    }
}

impl PoolOption {
    pub fn threads(self, threads: usize) -> Self {
        Self { threads: Some(threads), ..self }
    }
    pub fn thread_name(self, name: impl Into<SmolStr>) -> Self {
        Self { thread_name: name.into(), ..self }
    }

    pub fn resolve_threads(&self) -> usize {
        let n = match self.threads {
            Some(n) => n,
            None => thread::available_parallelism().map_or(1, NonZeroUsize::get),
        };
        n.max(1)
    }
}

struct PoolState {
    idle: usize,
    stopped: bool,
    completed: bool,
}

struct PoolShared {
    queue: TaskQueue<Box<dyn IPoolJob>>,
    /// Lock order: `state` before the queue lock.
    state: Mutex<PoolState>,
    work_cv: Condvar,
    done_cv: Condvar,
    nthreads: usize,
}

pub struct WorkerPool {
    shared: Arc<PoolShared>,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub fn new(option: PoolOption) -> PoolRes<Self> {
        let nthreads = option.resolve_threads();
        let shared = Arc::new(PoolShared {
            queue: TaskQueue::new(),
            state: Mutex::new(PoolState { idle: 0, stopped: false, completed: true }),
            work_cv: Condvar::new(),
            done_cv: Condvar::new(),
            nthreads,
        });
        let pool = WorkerPool { shared, threads: Mutex::new(Vec::with_capacity(nthreads)) };

        for i in 0..nthreads {
            let shared = pool.shared.clone();
            let spawned = thread::Builder::new()
                .name(format!("{}-{i}", option.thread_name))
                .spawn(move || worker_main(shared));
            match spawned {
                Ok(handle) => pool.threads.lock().push(handle),
                Err(e) => {
                    // `pool` is dropped here, which joins what was spawned so far.
                    log::error!("worker pool: spawning thread {i} failed: {e}");
                    return Err(e.into());
                }
            }
        }
        log::debug!("worker pool: started {nthreads} threads");
        Ok(pool)
    }

    pub fn with_threads(threads: usize) -> PoolRes<Self> {
        Self::new(PoolOption::default().threads(threads))
    }

    pub fn pool_size(&self) -> usize {
        self.shared.nthreads
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.state.lock().stopped
    }
    pub fn is_completed(&self) -> bool {
        self.shared.state.lock().completed
    }

    /// Queues `job` and wakes one idle worker.
    ///
    /// Rejected with [`PoolError::Stopped`] after a hard stop; the job is dropped.
    pub fn submit(&self, job: impl IPoolJob) -> PoolRes {
        self.submit_boxed(Box::new(job))
    }

    pub fn submit_boxed(&self, job: Box<dyn IPoolJob>) -> PoolRes {
        let mut state = self.shared.state.lock();
        if state.stopped {
            return Err(PoolError::Stopped);
        }
        self.shared.queue.push(job);
        state.completed = false;
        self.shared.work_cv.notify_one();
        Ok(())
    }

    /// `stop(false)` is a hard stop, `stop(true)` waits for completion.
    pub fn stop(&self, wait: bool) {
        if wait { self.wait() } else { self.hard_stop() }
    }

    /// Blocks until the queue is empty and every worker is idle.
    ///
    /// Returns immediately if the pool is already quiescent or hard-stopped.
    /// Must not be called from inside a job: the calling worker would never
    /// become idle.
    pub fn wait(&self) {
        let mut state = self.shared.state.lock();
        while !state.completed && !state.stopped {
            self.shared.done_cv.wait(&mut state);
        }
    }

    /// Discards every queued job, then joins all worker threads.
    ///
    /// Jobs already running are finished first. Calling this twice is a no-op.
    /// May be called from inside a job, including by dropping the last handle
    /// to the pool there; the calling worker is then detached, not joined.
    pub fn hard_stop(&self) {
        let discarded = {
            let mut state = self.shared.state.lock();
            if state.stopped {
                return;
            }
            state.stopped = true;
            let discarded = self.shared.queue.clear();
            self.shared.work_cv.notify_all();
            self.shared.done_cv.notify_all();
            discarded
        };
        let threads = std::mem::take(&mut *self.threads.lock());
        let current = thread::current().id();
        for handle in threads {
            // Stopped from one of its own jobs: that worker cannot join
            // itself. Its handle is detached and it exits once the job returns.
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::error!("worker pool: a worker thread terminated abnormally");
            }
        }
        log::debug!("worker pool: stopped, {discarded} queued jobs discarded");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.hard_stop();
    }
}

fn worker_main(shared: Arc<PoolShared>) {
    let mut state = shared.state.lock();
    loop {
        if state.stopped {
            break;
        }
        if let Some(job) = shared.queue.pop() {
            MutexGuard::unlocked(&mut state, || run_job(job));
            // keep draining until the queue is empty or the pool is stopped
            continue;
        }

        state.idle += 1;
        if state.idle == shared.nthreads && shared.queue.is_empty() && !state.completed {
            state.completed = true;
            shared.done_cv.notify_all();
        }
        // woken by a push, a stop, or spuriously; the loop re-checks everything
        shared.work_cv.wait(&mut state);
        state.idle -= 1;
    }
}

fn run_job(job: Box<dyn IPoolJob>) {
    log::trace!("worker {:?}: running job", thread::current().name());
    if let Err(payload) = catch_unwind(AssertUnwindSafe(move || job.execute())) {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string panic payload>".to_string());
        log::error!("worker pool: job panicked: {msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            mpsc,
        },
        time::Duration,
    };

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_pool_size() {
        let pool = WorkerPool::with_threads(3).unwrap();
        assert_eq!(pool.pool_size(), 3);

        let pool = WorkerPool::with_threads(0).unwrap();
        assert_eq!(pool.pool_size(), 1);

        let pool = WorkerPool::new(PoolOption::default()).unwrap();
        assert!(pool.pool_size() >= 1);
    }

    #[test]
    fn test_wait_runs_everything() {
        init_logger();
        for nthreads in [1, 2, 4, 8] {
            for njobs in [0, 1, 7, 100] {
                let pool = WorkerPool::with_threads(nthreads).unwrap();
                let counter = Arc::new(AtomicUsize::new(0));
                for _ in 0..njobs {
                    let counter = counter.clone();
                    pool.submit(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
                }
                pool.stop(true);
                assert_eq!(counter.load(Ordering::SeqCst), njobs, "{nthreads} threads");
                assert!(pool.is_completed());
            }
        }
    }

    #[test]
    fn test_worker_keeps_draining() {
        // A single thread must process every job, not just the first one.
        let pool = WorkerPool::with_threads(1).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..50 {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn test_reuse_after_wait() {
        let pool = WorkerPool::with_threads(2).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for round in 1..=3 {
            for _ in 0..10 {
                let counter = counter.clone();
                pool.submit(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
            pool.wait();
            assert_eq!(counter.load(Ordering::SeqCst), round * 10);
        }
    }

    #[test]
    fn test_wait_covers_slow_jobs() {
        let pool = WorkerPool::with_threads(4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let counter = counter.clone();
            pool.submit(move || {
                thread::sleep(Duration::from_millis(20));
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_hard_stop_discards_and_joins() {
        init_logger();
        let pool = WorkerPool::with_threads(2).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..200 {
            let counter = counter.clone();
            pool.submit(move || {
                thread::sleep(Duration::from_millis(5));
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.stop(false);
        assert!(pool.is_stopped());
        assert!(pool.threads.lock().is_empty());

        let ran = counter.load(Ordering::SeqCst);
        assert!(ran < 200);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(counter.load(Ordering::SeqCst), ran, "no job may run after hard stop");
    }

    #[test]
    fn test_stop_is_idempotent() {
        let pool = WorkerPool::with_threads(2).unwrap();
        pool.hard_stop();
        pool.hard_stop();
        // soft stop after a hard stop returns at once
        pool.wait();
        assert!(matches!(pool.submit(|| {}), Err(PoolError::Stopped)));
    }

    #[test]
    fn test_wait_on_fresh_pool() {
        let pool = WorkerPool::with_threads(3).unwrap();
        pool.wait();
        assert!(pool.is_completed());
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        init_logger();
        let pool = WorkerPool::with_threads(1).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        pool.submit(|| panic!("boom")).unwrap();
        for _ in 0..5 {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_jobs_submitting_jobs() {
        let pool = Arc::new(WorkerPool::with_threads(2).unwrap());
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let inner_pool = pool.clone();
            let counter = counter.clone();
            pool.submit(move || {
                for _ in 0..10 {
                    let counter = counter.clone();
                    inner_pool
                        .submit(move || {
                            counter.fetch_add(1, Ordering::SeqCst);
                        })
                        .unwrap();
                }
            })
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 10);
        pool.hard_stop();
    }

    #[test]
    fn test_last_handle_dropped_inside_job() {
        init_logger();
        let pool = Arc::new(WorkerPool::with_threads(2).unwrap());
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel();
        let inner_pool = pool.clone();
        pool.submit(move || {
            go_rx.recv().unwrap();
            // the last handle: dropping it hard-stops the pool from this worker
            drop(inner_pool);
            done_tx.send(thread::current().id()).unwrap();
        })
        .unwrap();
        drop(pool);
        go_tx.send(()).unwrap();

        let finished_on = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(finished_on, thread::current().id());
    }

    #[test]
    fn test_hard_stop_from_inside_job() {
        let pool = Arc::new(WorkerPool::with_threads(3).unwrap());
        let (done_tx, done_rx) = mpsc::channel();
        let inner_pool = pool.clone();
        pool.submit(move || {
            inner_pool.hard_stop();
            done_tx.send(inner_pool.is_stopped()).unwrap();
        })
        .unwrap();

        assert!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap());
        assert!(pool.is_stopped());
        assert!(matches!(pool.submit(|| {}), Err(PoolError::Stopped)));
        pool.hard_stop();
    }
}
