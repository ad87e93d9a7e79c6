use std::io;
use thiserror::Error;

/// Error type for pool construction.
///
/// The pools themselves have no error taxonomy of their own: failures
/// inside a submitted job belong to the job, and submission to a live pool
/// cannot fail. The only thing that can go wrong in this crate is spawning
/// a worker thread.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The operating system refused to spawn a worker thread.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for pool construction.
pub type Result<T> = std::result::Result<T, PoolError>;
