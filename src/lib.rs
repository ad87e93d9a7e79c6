#![deny(missing_docs)]

//! A factory for preconfigured thread pools.
//!
//! This library provides a process-wide [`ExecutorFactory`] exposing three
//! pool constructors: a cached pool that grows on demand and retires idle
//! workers, a scheduled pool for delayed and periodic tasks, and a
//! single-thread executor with strict FIFO ordering. Every worker thread
//! created by these pools is given a counter-derived name for log and
//! thread-dump readability.
//!
//! ```no_run
//! use std::time::Duration;
//! use poolkit::ExecutorFactory;
//!
//! let pool = ExecutorFactory::instance()
//!     .new_scheduled_thread_pool(1)
//!     .unwrap();
//! let handle = pool.schedule_at_fixed_rate(
//!     Duration::ZERO,
//!     Duration::from_secs(5),
//!     || {
//!         // poll a server, refresh a cache, ...
//!     },
//! );
//! // later:
//! handle.cancel();
//! ```

mod error;
mod factory;
/// The three pool implementations returned by the factory.
pub mod pool;
mod thread_factory;

pub use error::{PoolError, Result};
pub use factory::ExecutorFactory;
pub use pool::{CachedThreadPool, ScheduledHandle, ScheduledThreadPool, SingleThreadExecutor};
pub use thread_factory::ThreadNamer;
