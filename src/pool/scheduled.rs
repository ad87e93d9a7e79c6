use std::cmp::Ordering as CmpOrdering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, error};
use once_cell::sync::OnceCell;

use super::Job;
use crate::thread_factory::ThreadNamer;
use crate::Result;

/// A pool for delayed and periodic task execution.
///
/// Tasks wait in a time-ordered delay queue and are picked up by a fixed
/// set of persistent workers once their deadline arrives. A task never runs
/// earlier than its scheduled time; among tasks scheduled for the identical
/// instant, relative order is unspecified.
///
/// With a core size of 0 the pool still accepts tasks and starts a single
/// worker on first submission.
pub struct ScheduledThreadPool {
    inner: Arc<Inner>,
    namer: Arc<ThreadNamer>,
    core_pool_size: usize,
    lazy_worker: OnceCell<()>,
    workers: Vec<JoinHandle<()>>,
}

/// Cancellation handle for a periodic task.
///
/// Cancellation is cooperative: a run already in progress completes, and
/// the task is simply never rescheduled afterwards.
pub struct ScheduledHandle {
    cancelled: Arc<AtomicBool>,
}

impl ScheduledHandle {
    /// Stops the periodic task from running again.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// State shared between the pool handle and its workers.
struct Inner {
    queue: Mutex<BinaryHeap<Reverse<Entry>>>,
    available: Condvar,
    shutdown: AtomicBool,
    seq: AtomicU64,
}

/// A queued task with its release deadline.
struct Entry {
    deadline: Instant,
    // Tie-breaker keeping the heap deterministic for equal deadlines.
    seq: u64,
    kind: TaskKind,
}

enum TaskKind {
    Once(Job),
    Periodic(PeriodicTask),
}

struct PeriodicTask {
    task: Box<dyn Fn() + Send>,
    period: Duration,
    fixed_rate: bool,
    cancelled: Arc<AtomicBool>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.deadline
            .cmp(&other.deadline)
            .then(self.seq.cmp(&other.seq))
    }
}

impl ScheduledThreadPool {
    pub(crate) fn new(core_pool_size: usize, namer: Arc<ThreadNamer>) -> Result<Self> {
        let inner = Arc::new(Inner {
            queue: Mutex::new(BinaryHeap::new()),
            available: Condvar::new(),
            shutdown: AtomicBool::new(false),
            seq: AtomicU64::new(0),
        });

        let mut workers = Vec::with_capacity(core_pool_size);
        for _ in 0..core_pool_size {
            let inner = inner.clone();
            workers.push(namer.builder().spawn(move || worker_loop(&inner))?);
        }

        Ok(ScheduledThreadPool {
            inner,
            namer,
            core_pool_size,
            lazy_worker: OnceCell::new(),
            workers,
        })
    }

    /// Schedules a one-shot task to run after `delay`.
    ///
    /// The task runs no earlier than `delay` from now; it may run later if
    /// all workers are busy when the deadline arrives.
    pub fn schedule<F>(&self, delay: Duration, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Instant::now() + delay, TaskKind::Once(Box::new(job)));
    }

    /// Schedules `task` to run repeatedly at a fixed rate.
    ///
    /// The first run happens after `initial_delay`; each subsequent run is
    /// scheduled `period` after the *previous deadline*, so the cadence
    /// does not drift with task duration. A run that panics stops the
    /// series.
    pub fn schedule_at_fixed_rate<F>(
        &self,
        initial_delay: Duration,
        period: Duration,
        task: F,
    ) -> ScheduledHandle
    where
        F: Fn() + Send + 'static,
    {
        self.schedule_periodic(initial_delay, period, true, Box::new(task))
    }

    /// Schedules `task` to run repeatedly with a fixed delay.
    ///
    /// Each subsequent run is scheduled `delay` after the previous run
    /// *completes*. A run that panics stops the series.
    pub fn schedule_with_fixed_delay<F>(
        &self,
        initial_delay: Duration,
        delay: Duration,
        task: F,
    ) -> ScheduledHandle
    where
        F: Fn() + Send + 'static,
    {
        self.schedule_periodic(initial_delay, delay, false, Box::new(task))
    }

    /// Signals the workers, wakes them, and waits for them to exit.
    ///
    /// Tasks still waiting in the delay queue are discarded; a task already
    /// claimed by a worker runs to completion.
    pub fn shutdown(mut self) {
        signal_shutdown(&self.inner);
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }

    fn schedule_periodic(
        &self,
        initial_delay: Duration,
        period: Duration,
        fixed_rate: bool,
        task: Box<dyn Fn() + Send>,
    ) -> ScheduledHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.submit(
            Instant::now() + initial_delay,
            TaskKind::Periodic(PeriodicTask {
                task,
                period,
                fixed_rate,
                cancelled: cancelled.clone(),
            }),
        );
        ScheduledHandle { cancelled }
    }

    fn submit(&self, deadline: Instant, kind: TaskKind) {
        if self.core_pool_size == 0 {
            self.lazy_worker.get_or_init(|| {
                let inner = self.inner.clone();
                self.namer
                    .builder()
                    .spawn(move || worker_loop(&inner))
                    .expect("failed to spawn worker thread");
            });
        }

        push_entry(&self.inner, deadline, kind);
    }
}

impl Drop for ScheduledThreadPool {
    fn drop(&mut self) {
        // Workers exit once they observe the flag; joined only through an
        // explicit `shutdown` call.
        signal_shutdown(&self.inner);
    }
}

/// Sets the shutdown flag and wakes every worker.
///
/// The queue lock must be held across the store and the notify: a worker
/// checks the flag and enters its condvar wait with the lock held, so
/// signalling under the same lock cannot land inside that window and get
/// lost.
fn signal_shutdown(inner: &Inner) {
    let _queue = lock_queue(inner);
    inner.shutdown.store(true, Ordering::Release);
    inner.available.notify_all();
}

fn push_entry(inner: &Inner, deadline: Instant, kind: TaskKind) {
    let seq = inner.seq.fetch_add(1, Ordering::Relaxed);
    let mut queue = lock_queue(inner);
    queue.push(Reverse(Entry {
        deadline,
        seq,
        kind,
    }));
    drop(queue);
    inner.available.notify_one();
}

fn lock_queue(inner: &Inner) -> MutexGuard<'_, BinaryHeap<Reverse<Entry>>> {
    // User code never runs under this lock, so poisoning would indicate a
    // bug in the pool itself.
    inner.queue.lock().expect("delay queue lock poisoned")
}

/// Drains the delay queue, sleeping until the earliest deadline.
fn worker_loop(inner: &Inner) {
    let mut queue = lock_queue(inner);
    loop {
        if inner.shutdown.load(Ordering::Acquire) {
            return;
        }

        let now = Instant::now();
        match queue.peek() {
            None => {
                queue = inner
                    .available
                    .wait(queue)
                    .expect("delay queue lock poisoned");
            }
            Some(Reverse(entry)) if entry.deadline > now => {
                let timeout = entry.deadline - now;
                queue = inner
                    .available
                    .wait_timeout(queue, timeout)
                    .expect("delay queue lock poisoned")
                    .0;
            }
            Some(_) => {
                let Reverse(entry) = queue.pop().expect("peeked entry vanished");
                drop(queue);
                run_entry(inner, entry);
                queue = lock_queue(inner);
            }
        }
    }
}

fn run_entry(inner: &Inner, entry: Entry) {
    match entry.kind {
        TaskKind::Once(job) => {
            debug!("Running one-shot scheduled task");
            if std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).is_err() {
                error!("Scheduled task panicked");
            }
        }
        TaskKind::Periodic(periodic) => {
            if periodic.cancelled.load(Ordering::Acquire) {
                return;
            }

            debug!("Running periodic task");
            let panicked =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (periodic.task)()))
                    .is_err();
            if panicked {
                // A failed run suppresses all subsequent runs.
                error!("Periodic task panicked, series stopped");
                return;
            }
            if periodic.cancelled.load(Ordering::Acquire) {
                return;
            }

            let next = if periodic.fixed_rate {
                entry.deadline + periodic.period
            } else {
                Instant::now() + periodic.period
            };
            push_entry(inner, next, TaskKind::Periodic(periodic));
        }
    }
}
