//! Error types for index and lock operations.

use thiserror::Error;

/// Errors that can occur in index, staleness, and lock operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error during store or marker operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A path could not be canonicalized.
    #[error("Cannot canonicalize path '{path}': {source}")]
    Canonicalize {
        /// The offending path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The in-memory index could not be serialized for persistence.
    #[error("Index serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Atomic replacement of the store file failed.
    #[error("Atomic store replace failed: {0}")]
    Persist(String),
}

/// Result type for index and lock operations.
pub type Result<T> = std::result::Result<T, Error>;
