use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::pool::{CachedThreadPool, ScheduledThreadPool, SingleThreadExecutor};
use crate::thread_factory::ThreadNamer;
use crate::Result;

/// A factory producing ready-to-use thread pools with fixed policies.
///
/// The factory holds no state of its own; it exists so that callers share
/// one well-known entry point for pool construction. Obtain it through
/// [`ExecutorFactory::instance`], then call one of the three constructors
/// and interact with the returned pool directly.
#[derive(Debug)]
pub struct ExecutorFactory {
    _private: (),
}

impl ExecutorFactory {
    /// Returns the shared process-wide factory.
    ///
    /// The instance is created lazily on first access and lives for the
    /// rest of the process. Concurrent first calls all observe the same
    /// reference.
    pub fn instance() -> &'static ExecutorFactory {
        static INSTANCE: OnceCell<ExecutorFactory> = OnceCell::new();

        INSTANCE.get_or_init(|| ExecutorFactory { _private: () })
    }

    /// Creates an elastic pool with no minimum worker count.
    ///
    /// A submitted job is handed directly to an idle worker if one exists;
    /// otherwise a new worker is spawned for it immediately. Jobs are never
    /// buffered. Workers idle for 60 seconds exit. There is no admission
    /// control: sustained load grows the pool without bound.
    pub fn new_cached_thread_pool(&self) -> Result<CachedThreadPool> {
        Ok(CachedThreadPool::new(Arc::new(ThreadNamer::new())))
    }

    /// Creates a pool for delayed and periodic task execution.
    ///
    /// `core_pool_size` persistent workers drain an internal time-ordered
    /// delay queue. Tasks run no earlier than their scheduled time;
    /// relative order among tasks scheduled for the identical instant is
    /// unspecified. A size of 0 is accepted: the pool still takes tasks
    /// and starts a single worker on first submission.
    ///
    /// # Errors
    ///
    /// Returns an error if a core worker thread cannot be spawned.
    pub fn new_scheduled_thread_pool(&self, core_pool_size: usize) -> Result<ScheduledThreadPool> {
        ScheduledThreadPool::new(core_pool_size, Arc::new(ThreadNamer::new()))
    }

    /// Creates an executor with exactly one persistent worker.
    ///
    /// Jobs are buffered in an unbounded FIFO queue and execute strictly in
    /// submission order; a second concurrently running job is impossible.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be spawned.
    pub fn new_single_thread_executor(&self) -> Result<SingleThreadExecutor> {
        SingleThreadExecutor::new(Arc::new(ThreadNamer::new()))
    }
}
