//! The pipeline driver.

use crate::error::{Error, Result};
use chrono::Utc;
use folio_catalog::{Candidate, CatalogBuilder};
use folio_core::{NoteDraft, NoteWriter, OcrEngine, Rasterizer, Thresholds, VaultConfig};
use folio_index::{needs_processing, DebounceDecision, Debouncer, ProcessingIndex, RunLock};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for pipeline behavior.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Bypass the staleness check and treat every document as needing
    /// processing. The index is still updated afterward so it stays
    /// current. Does not bypass the debounce window.
    pub force: bool,
    /// Time windows for staleness and lock coordination.
    pub thresholds: Thresholds,
}

/// Counts for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents transcribed, linked, written, and recorded.
    pub processed: usize,
    /// Documents skipped as up to date or debounced.
    pub skipped: usize,
    /// Documents that failed (left unrecorded, retried next run).
    pub failed: usize,
}

/// Outcome of one invocation.
#[derive(Debug)]
pub enum RunOutcome {
    /// Another run holds the global lock; nothing was done. This is a
    /// normal no-op success, not an error.
    SkippedLocked,
    /// The run completed (possibly with per-document failures).
    Completed(RunSummary),
}

enum DocumentOutcome {
    Processed,
    Skipped,
}

/// Orchestrates one invocation over a set of in-scope documents.
///
/// Collaborators are injected as `Arc<dyn Trait>`; the driver owns no I/O
/// logic of its own beyond sequencing the phases.
pub struct PipelineDriver {
    ocr: Arc<dyn OcrEngine>,
    rasterizer: Arc<dyn Rasterizer>,
    writer: Arc<dyn NoteWriter>,
    vault: VaultConfig,
    config: PipelineConfig,
}

impl PipelineDriver {
    /// Create a driver with the given collaborators and configuration.
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        rasterizer: Arc<dyn Rasterizer>,
        writer: Arc<dyn NoteWriter>,
        vault: VaultConfig,
        config: PipelineConfig,
    ) -> Self {
        Self {
            ocr,
            rasterizer,
            writer,
            vault,
            config,
        }
    }

    /// Run the pipeline over `documents`.
    ///
    /// Acquires the global run lock for the whole run; observing it held is
    /// a prompt no-side-effect skip. Per-document failures are logged and
    /// counted, never propagated — a failed document's index entry is left
    /// untouched so the next run retries it from scratch.
    pub async fn run(&self, documents: &[std::path::PathBuf]) -> Result<RunOutcome> {
        let guard = RunLock::acquire(&self.vault.lock_dir(), self.config.thresholds.lock_stale())?;
        let Some(_guard) = guard else {
            info!("another run is in progress, skipping");
            return Ok(RunOutcome::SkippedLocked);
        };

        let catalog = CatalogBuilder::new()
            .build(&self.vault.pages_path(), &self.vault.journals_path())?;
        let stats = CatalogBuilder::stats(&catalog);
        debug!(
            pages = stats.pages,
            referenced = stats.referenced,
            "reference catalog ready"
        );

        let index = ProcessingIndex::open(self.vault.index_path());
        let debouncer = Debouncer::new(self.vault.lock_dir(), self.config.thresholds.debounce());

        let mut summary = RunSummary::default();
        for document in documents {
            match self
                .process_document(document, &index, &debouncer, &catalog)
                .await
            {
                Ok(DocumentOutcome::Processed) => summary.processed += 1,
                Ok(DocumentOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    warn!(document = %document.display(), error = %e, "document failed, will retry next run");
                    summary.failed += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            "run complete"
        );
        Ok(RunOutcome::Completed(summary))
    }

    async fn process_document(
        &self,
        document: &Path,
        index: &ProcessingIndex,
        debouncer: &Debouncer,
        catalog: &[Candidate],
    ) -> Result<DocumentOutcome> {
        if debouncer.try_debounce(document)? == DebounceDecision::Skip {
            debug!(document = %document.display(), "duplicate trigger, debounced");
            return Ok(DocumentOutcome::Skipped);
        }

        if !self.config.force
            && !needs_processing(document, &index.load(), self.config.thresholds.grace())?
        {
            debug!(document = %document.display(), "up to date");
            return Ok(DocumentOutcome::Skipped);
        }

        let pages = self.rasterizer.rasterize(document).await?;
        if pages.is_empty() {
            return Err(Error::EmptyDocument(document.to_path_buf()));
        }

        let mut transcriptions = Vec::with_capacity(pages.len());
        for page in &pages {
            // Any page failure aborts this document; the index entry stays
            // untouched so the whole document is retried next run.
            let text = self.ocr.transcribe(&page.bytes).await?;
            transcriptions.push(text);
        }
        let body = transcriptions.join("\n\n");

        let linked = folio_catalog::link(&body, catalog);

        let title = document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        let draft = NoteDraft::new(title, document.to_path_buf(), Utc::now(), linked);
        let written = self.writer.write(&draft).await?;
        debug!(note = %written.display(), "note written");

        index.upsert(document, Utc::now())?;
        Ok(DocumentOutcome::Processed)
    }
}
