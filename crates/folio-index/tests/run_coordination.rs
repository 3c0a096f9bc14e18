//! Integration tests for run coordination: the global lock gating index
//! writes across overlapping invocations.

use chrono::Utc;
use folio_index::{needs_processing, ProcessingIndex, RunLock};
use std::time::Duration;
use tempfile::TempDir;

const STALE_AFTER: Duration = Duration::from_secs(600);
const GRACE: Duration = Duration::from_secs(5);

#[test]
fn overlapping_invocation_skips_without_touching_index() {
    let vault = TempDir::new().unwrap();
    let lock_dir = vault.path().join("locks");
    let doc = vault.path().join("scan.pdf");
    std::fs::write(&doc, b"pdf").unwrap();

    let index = ProcessingIndex::open(vault.path().join("index.toml"));

    // First invocation holds the lock and processes.
    let first = RunLock::acquire(&lock_dir, STALE_AFTER).unwrap().unwrap();
    index.upsert(&doc, Utc::now()).unwrap();

    // Second invocation arrives while the first is mid-run: it must observe
    // the held lock and leave the index exactly as the first run wrote it.
    assert!(RunLock::acquire(&lock_dir, STALE_AFTER).unwrap().is_none());
    assert_eq!(index.load().len(), 1);

    drop(first);
    assert!(RunLock::acquire(&lock_dir, STALE_AFTER).unwrap().is_some());
}

#[test]
fn crashed_run_is_reclaimed_and_document_reprocessed() {
    let vault = TempDir::new().unwrap();
    let lock_dir = vault.path().join("locks");
    let doc = vault.path().join("scan.pdf");
    std::fs::write(&doc, b"pdf").unwrap();

    // Simulate a crashed run: marker left behind, no index entry written.
    std::fs::create_dir_all(&lock_dir).unwrap();
    std::fs::write(lock_dir.join("run.lock"), "pid = 1").unwrap();

    // With a zero staleness threshold the abandoned marker is reclaimable.
    let guard = RunLock::acquire(&lock_dir, Duration::ZERO).unwrap();
    assert!(guard.is_some());

    // The crashed run never upserted, so the document still needs work.
    let index = ProcessingIndex::open(vault.path().join("index.toml"));
    assert!(needs_processing(&doc, &index.load(), GRACE).unwrap());

    index.upsert(&doc, Utc::now()).unwrap();
    assert!(!needs_processing(&doc, &index.load(), GRACE).unwrap());
}
