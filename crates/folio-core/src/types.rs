//! Data types flowing through the ingestion pipeline.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One rasterized page of a source document, ready for OCR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// 1-based page number within the source document.
    pub page_number: usize,
    /// Encoded image bytes (format is a contract between rasterizer and
    /// OCR provider, typically PNG).
    pub bytes: Vec<u8>,
}

impl PageImage {
    /// Create a page image.
    pub fn new(page_number: usize, bytes: Vec<u8>) -> Self {
        Self { page_number, bytes }
    }
}

/// The assembled note handed to the note writer.
///
/// The body has already been through the reference linker; the writer only
/// serializes it into the vault's on-disk note format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    /// Display title, derived from the source document's file stem.
    pub title: String,
    /// Path of the source document this note was transcribed from.
    pub source: PathBuf,
    /// When the transcription was produced.
    pub date: DateTime<Utc>,
    /// Linked body text.
    pub body: String,
}

impl NoteDraft {
    /// Create a note draft.
    pub fn new(title: impl Into<String>, source: PathBuf, date: DateTime<Utc>, body: String) -> Self {
        Self {
            title: title.into(),
            source,
            date,
            body,
        }
    }
}
