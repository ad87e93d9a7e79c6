/// A unit of work submitted to a pool.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

mod cached;
mod scheduled;
mod single;

pub use self::cached::CachedThreadPool;
pub use self::scheduled::{ScheduledHandle, ScheduledThreadPool};
pub use self::single::SingleThreadExecutor;
