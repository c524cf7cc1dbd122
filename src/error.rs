//! Error type shared by the workers and the entry point.

use std::io;
use thiserror::Error;

/// Errors that stop a worker.
///
/// Expected terminations (interrupt, EOF, escape) are not errors; they are
/// reported as [`Outcome::Terminate`](crate::actor::Outcome::Terminate).
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal I/O failed while reading keys, querying size or writing.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// A slash command's extension failed or returned a malformed result.
    #[error("external command {code} failed: {reason}")]
    ExternalCommand {
        /// Control code that was being resolved.
        code: i32,
        /// What went wrong.
        reason: String,
    },

    /// A host command table could not be merged with the defaults.
    #[error("command table conflict: {0}")]
    CommandTable(String),

    /// The other end of the work queue went away.
    #[error("work queue closed")]
    QueueClosed,

    /// A worker thread panicked.
    #[error("worker thread failed: {0}")]
    Worker(String),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
