//! Incremental processing state for the folio pipeline.
//!
//! Three pieces live here, all operating on plain files so that independent
//! short-lived invocations of the tool coordinate without any daemon:
//!
//! - [`ProcessingIndex`]: a persisted mapping from canonical document path to
//!   last-processed timestamp, loaded tolerantly and rewritten atomically.
//! - [`needs_processing`]: the staleness check comparing a document's mtime
//!   against its index entry, with a configurable grace window.
//! - [`RunLock`] / [`Debouncer`]: the two levels of mutual exclusion — a
//!   global run lock with staleness-based takeover, and a per-document
//!   debounce marker that collapses duplicate filesystem events.
//!
//! Correctness of concurrent index writes is delegated entirely to the
//! global run lock; `ProcessingIndex` itself only guarantees that no reader
//! ever observes a half-written store.

pub mod error;
pub mod lock;
pub mod stale;
pub mod store;

pub use error::{Error, Result};
pub use lock::{DebounceDecision, Debouncer, RunLock, RunLockGuard};
pub use stale::needs_processing;
pub use store::{IndexMap, ProcessingIndex};
