//! Error types shared across the folio crates.

use thiserror::Error;

/// Errors raised by OCR and rasterization collaborators.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The provider returned an explicit failure for a page.
    #[error("OCR provider rejected page: {0}")]
    Provider(String),

    /// Transport-level failure talking to the provider.
    #[error("OCR transport error: {0}")]
    Transport(String),

    /// The provider response could not be interpreted.
    #[error("Invalid OCR response: {0}")]
    InvalidResponse(String),

    /// A required external tool is not available.
    #[error("External tool '{0}' is not available")]
    MissingTool(String),

    /// A required credential is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// IO error while preparing or reading page images.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for OCR and rasterization operations.
pub type OcrResult<T> = std::result::Result<T, OcrError>;

/// Errors raised by core collaborators other than OCR.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Note could not be written to the vault.
    #[error("Note write failed: {0}")]
    NoteWrite(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
