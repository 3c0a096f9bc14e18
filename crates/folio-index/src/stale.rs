//! Staleness check: does a document need (re)processing?

use crate::error::Result;
use crate::store::{canonicalize_key, IndexMap};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use tracing::trace;

/// Decide whether `path` must be processed, given the loaded index.
///
/// A document absent from the index has never been processed and always
/// needs a run. Otherwise it needs one only if its modification time exceeds
/// the stored last-processed time by more than `grace` — the grace window
/// absorbs clock skew and the few seconds a write takes, so a document whose
/// mtime is equal to, older than, or within-grace-newer than its entry is
/// reported as up to date.
///
/// Force mode is handled by the caller: it bypasses this check entirely but
/// still upserts the index afterward.
pub fn needs_processing(path: &Path, index: &IndexMap, grace: Duration) -> Result<bool> {
    let key = canonicalize_key(path)?;
    let Some(last_processed) = index.get(&key) else {
        trace!(path = %key, "no index entry, needs processing");
        return Ok(true);
    };

    let modified: DateTime<Utc> = std::fs::metadata(path)?.modified()?.into();
    let delta = modified - *last_processed;
    let grace = chrono::Duration::from_std(grace).unwrap_or(chrono::Duration::MAX);

    let needs = delta > grace;
    trace!(path = %key, delta_ms = delta.num_milliseconds(), needs, "staleness check");
    Ok(needs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProcessingIndex;
    use tempfile::TempDir;

    const GRACE: Duration = Duration::from_secs(5);

    fn fixture() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("scan.pdf");
        std::fs::write(&doc, b"pdf").unwrap();
        (dir, doc)
    }

    #[test]
    fn absent_from_index_needs_processing() {
        let (_dir, doc) = fixture();
        let index = IndexMap::new();
        assert!(needs_processing(&doc, &index, GRACE).unwrap());
    }

    #[test]
    fn processed_just_now_does_not_need_processing() {
        let (dir, doc) = fixture();
        let store = ProcessingIndex::open(dir.path().join("index.toml"));
        store.upsert(&doc, Utc::now()).unwrap();

        let index = store.load();
        assert!(!needs_processing(&doc, &index, GRACE).unwrap());
    }

    #[test]
    fn old_entry_flips_to_needs_processing() {
        let (dir, doc) = fixture();
        let store = ProcessingIndex::open(dir.path().join("index.toml"));
        store.upsert(&doc, Utc::now() - chrono::Duration::hours(1)).unwrap();

        let index = store.load();
        assert!(needs_processing(&doc, &index, GRACE).unwrap());
    }

    #[test]
    fn entry_newer_than_mtime_does_not_need_processing() {
        let (dir, doc) = fixture();
        let store = ProcessingIndex::open(dir.path().join("index.toml"));
        // Last-processed in the future relative to the file's mtime, as
        // happens when the index write lands after the document write.
        store.upsert(&doc, Utc::now() + chrono::Duration::minutes(5)).unwrap();

        let index = store.load();
        assert!(!needs_processing(&doc, &index, GRACE).unwrap());
    }

    #[test]
    fn mtime_within_grace_window_is_up_to_date() {
        let (dir, doc) = fixture();
        let store = ProcessingIndex::open(dir.path().join("index.toml"));
        // Entry slightly older than the mtime, but inside the grace window.
        store.upsert(&doc, Utc::now() - chrono::Duration::seconds(2)).unwrap();

        let index = store.load();
        assert!(!needs_processing(&doc, &index, GRACE).unwrap());
    }
}
