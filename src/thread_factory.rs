use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

/// Prefix for every worker thread name, derived from the factory type name.
const THREAD_NAME_PREFIX: &str = "ExecutorFactory";

/// A thread-naming counter shared by all workers of one pool.
///
/// Each pool built by the factory owns one `ThreadNamer`; names are unique
/// for the lifetime of that namer. The counter starts at 1 and is
/// incremented before first use, so the first worker of a fresh pool is
/// named `ExecutorFactory2`. The skipped `1` is long-standing behavior,
/// kept for compatibility; the tests pin it.
#[derive(Debug)]
pub struct ThreadNamer {
    count: AtomicU32,
}

impl ThreadNamer {
    /// Creates a namer with its counter at the initial value 1.
    pub fn new() -> Self {
        ThreadNamer {
            count: AtomicU32::new(1),
        }
    }

    /// Returns the next worker thread name.
    ///
    /// Safe to call from several threads at once; a pool may request
    /// multiple new workers concurrently during burst growth.
    pub fn next_name(&self) -> String {
        let n = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{THREAD_NAME_PREFIX}{n}")
    }

    /// Returns a [`thread::Builder`] carrying the next worker name.
    pub fn builder(&self) -> thread::Builder {
        thread::Builder::new().name(self.next_name())
    }
}

impl Default for ThreadNamer {
    fn default() -> Self {
        Self::new()
    }
}
