//! Error types for catalog construction.

use thiserror::Error;

/// Errors that can occur while building the reference catalog.
///
/// Note that a single unreadable corpus file is not an error: it is logged
/// and skipped so one bad file never aborts catalog construction.
#[derive(Error, Debug)]
pub enum Error {
    /// A corpus directory could not be walked at all.
    #[error("Cannot read corpus directory '{dir}': {source}")]
    CorpusUnreadable {
        /// The directory that failed.
        dir: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// IO error outside the per-file skip policy.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;
