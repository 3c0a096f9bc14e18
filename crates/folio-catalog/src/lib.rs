//! Reference catalog and cross-reference linker.
//!
//! The catalog builder scans the vault's pages and journals for linkable
//! topic names — both names of existing pages and names already referenced
//! in `[[...]]` markers — applies the exclusion rules, and hands the
//! resulting candidate set to the linker ordered longest-first.
//!
//! The linker rewrites assembled OCR text so bare occurrences of catalog
//! entries become explicit `[[...]]` references, using whole-word
//! case-insensitive matching and tracking already-linked spans so that
//! re-running it never double-wraps anything.

pub mod catalog;
pub mod error;
pub mod linker;

pub use catalog::{Candidate, CandidateOrigin, CatalogBuilder, CatalogStats, Exclusions};
pub use error::{Error, Result};
pub use linker::link;
