//! Collaborator traits injected into the pipeline.
//!
//! All three seams are object-safe async traits so the pipeline can hold
//! them as `Arc<dyn Trait>` and tests can substitute in-memory fakes.

use crate::error::{CoreResult, OcrResult};
use crate::types::{NoteDraft, PageImage};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// External OCR provider.
///
/// Any non-ok result, including explicit failure markers from the provider,
/// is a page failure: the pipeline aborts the current document without
/// updating the index so the document is retried on the next run.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Transcribe one page image into text.
    async fn transcribe(&self, image: &[u8]) -> OcrResult<String>;
}

/// Rasterizes a source document into per-page images.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Produce page images for `document`, in page order.
    async fn rasterize(&self, document: &Path) -> OcrResult<Vec<PageImage>>;

    /// Verify the rasterizer can run at all (external tool present).
    ///
    /// Called once at startup; a failure here is a setup error that aborts
    /// the invocation before any document is touched.
    async fn preflight(&self) -> OcrResult<()> {
        Ok(())
    }
}

/// Writes one assembled note into the vault.
///
/// Overwriting an existing note of the same derived title is allowed and
/// expected on reprocessing.
#[async_trait]
pub trait NoteWriter: Send + Sync {
    /// Persist the draft, returning the path of the written note.
    async fn write(&self, note: &NoteDraft) -> CoreResult<PathBuf>;
}
