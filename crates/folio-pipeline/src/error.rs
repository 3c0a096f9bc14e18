//! Error types for pipeline orchestration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// OCR or rasterization failure (aborts the current document only).
    #[error(transparent)]
    Ocr(#[from] folio_core::OcrError),

    /// Index or lock failure.
    #[error(transparent)]
    Index(#[from] folio_index::Error),

    /// Catalog construction failure.
    #[error(transparent)]
    Catalog(#[from] folio_catalog::Error),

    /// Note writer failure.
    #[error(transparent)]
    Write(#[from] folio_core::CoreError),

    /// The rasterizer produced no pages for a document.
    #[error("Document '{0}' produced no pages")]
    EmptyDocument(PathBuf),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
