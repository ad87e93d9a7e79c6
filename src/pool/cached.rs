use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use log::{debug, error};

use super::Job;
use crate::thread_factory::ThreadNamer;

/// How long an idle worker waits for another job before exiting.
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// An elastic thread pool with direct job hand-off.
///
/// The dispatch channel has zero capacity: a submitted job either reaches a
/// worker already parked on the channel, or a new worker is spawned with
/// that job as its first unit of work. Jobs are never buffered, so there is
/// no ordering guarantee across concurrently dispatched jobs, and nothing
/// limits how many workers sustained load can create.
///
/// Workers that sit idle for 60 seconds exit on their own.
pub struct CachedThreadPool {
    tx: Option<Sender<Job>>,
    rx: Receiver<Job>,
    namer: Arc<ThreadNamer>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl CachedThreadPool {
    pub(crate) fn new(namer: Arc<ThreadNamer>) -> Self {
        // Zero capacity: a send succeeds only by rendezvous with an idle
        // worker blocked on the receiving side.
        let (tx, rx) = channel::bounded::<Job>(0);

        CachedThreadPool {
            tx: Some(tx),
            rx,
            namer,
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Spawns a job into the pool.
    ///
    /// Never blocks: if no worker is idle, a new one is created for this
    /// job immediately.
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let tx = self.tx.as_ref().expect("pool queue already closed");
        match tx.try_send(Box::new(job)) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                let worker = spawn_worker(&self.namer, job, self.rx.clone());
                self.workers
                    .lock()
                    .expect("worker list lock poisoned")
                    .push(worker);
            }
            // The pool holds a sender for its whole lifetime, so the
            // channel cannot be disconnected here.
            Err(TrySendError::Disconnected(_)) => {
                unreachable!("cached pool channel disconnected while pool is alive")
            }
        }
    }

    /// Closes the hand-off channel and blocks until every worker has
    /// exited.
    ///
    /// In-flight jobs run to completion; idle workers observe the closed
    /// channel and exit immediately instead of waiting out their timeout.
    pub fn join(mut self) {
        drop(self.tx.take());
        let workers = std::mem::take(
            self.workers
                .get_mut()
                .expect("worker list lock poisoned"),
        );
        for worker in workers {
            let _ = worker.join();
        }
    }
}

/// Spawns a worker that runs `first` and then serves the hand-off channel
/// until it has been idle for [`IDLE_TIMEOUT`].
fn spawn_worker(namer: &ThreadNamer, first: Job, rx: Receiver<Job>) -> JoinHandle<()> {
    namer
        .builder()
        .spawn(move || {
            run_job(first);
            loop {
                match rx.recv_timeout(IDLE_TIMEOUT) {
                    Ok(job) => run_job(job),
                    Err(_) => {
                        // Idle timeout or pool dropped; either way this
                        // worker is done.
                        debug!(
                            "Worker {:?} retiring",
                            thread::current().name().unwrap_or("<unnamed>")
                        );
                        return;
                    }
                }
            }
        })
        .expect("failed to spawn worker thread")
}

/// Runs a job, catching panics so the worker loop continues.
fn run_job(job: Job) {
    debug!(
        "Worker {:?} executing job",
        thread::current().name().unwrap_or("<unnamed>")
    );
    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).is_err() {
        error!(
            "Worker {:?} job panicked, continuing",
            thread::current().name().unwrap_or("<unnamed>")
        );
    }
}

impl Drop for CachedThreadPool {
    fn drop(&mut self) {
        // Dropping the sender closes the channel; idle workers observe the
        // disconnect and exit without waiting out their timeout.
        drop(self.tx.take());
    }
}
