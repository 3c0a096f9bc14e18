//! Core types and collaborator traits for the folio ingestion pipeline.
//!
//! This crate defines the seams between the pipeline orchestrator and its
//! external collaborators. The OCR provider, the page rasterizer, and the
//! note writer are all expressed as async traits here so that the pipeline
//! and its tests can inject fakes without touching the network or external
//! binaries.
//!
//! ## Dependency direction
//!
//! Infrastructure crates (`folio-ocr`, `folio-pipeline`) depend on this crate
//! for the trait definitions; this crate depends on nothing above it. The
//! higher-level crates (CLI) wire concrete implementations into the pipeline.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{Thresholds, VaultConfig};
pub use error::{CoreError, CoreResult, OcrError, OcrResult};
pub use traits::{NoteWriter, OcrEngine, Rasterizer};
pub use types::{NoteDraft, PageImage};
