//! Pipeline orchestration layer.
//!
//! This crate coordinates, it does not implement business logic:
//!
//! 1. **Gate**: global run lock (skip whole run if held), per-document
//!    debounce marker, staleness check against the processing index.
//! 2. **Transcribe**: rasterize the document, OCR each page, concatenate.
//! 3. **Link**: rewrite the assembled text through the reference linker.
//! 4. **Write**: hand the draft to the note writer.
//! 5. **Record**: upsert the processing index under the global lock.
//!
//! All collaborators are injected via constructor so tests never invoke the
//! network or external binaries. Errors local to one document never abort a
//! batch; only lock contention ("cannot run at all", a no-op success) and
//! catalog-corpus setup failures end a run early.

pub mod driver;
pub mod error;
pub mod note_writer;

pub use driver::{PipelineConfig, PipelineDriver, RunOutcome, RunSummary};
pub use error::{Error, Result};
pub use note_writer::MarkdownNoteWriter;
