//! Two-level lock coordination across overlapping invocations.
//!
//! Both mechanisms are plain marker files whose mtime is the staleness
//! clock. A marker's existence does not guarantee its holder is alive, so
//! every marker has a maximum age after which it is considered abandoned.
//!
//! - [`RunLock`] serializes whole invocations: at most one run holds it; a
//!   second invocation observing a fresh marker exits promptly with no side
//!   effects. The guard removes the marker on every exit path.
//! - [`Debouncer`] suppresses reprocessing of one document within a short
//!   window, collapsing duplicate filesystem-event deliveries. It is a
//!   time-windowed suppression, not a mutex: markers are never released,
//!   they expire by age.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const RUN_LOCK_FILE: &str = "run.lock";

/// Age of a marker file, saturating to zero for mtimes in the future.
fn marker_age(path: &Path) -> std::io::Result<Duration> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(SystemTime::now()
        .duration_since(modified)
        .unwrap_or_default())
}

/// The global "another run is in progress" lock.
pub struct RunLock;

impl RunLock {
    /// Try to acquire the global run lock under `lock_dir`.
    ///
    /// Returns `Ok(None)` when another run currently holds a fresh marker —
    /// a normal "skip this run" outcome, not an error. A marker older than
    /// `stale_after` is considered abandoned: it is removed and acquisition
    /// proceeds. On success the returned guard removes the marker when
    /// dropped, regardless of how the run ends.
    pub fn acquire(lock_dir: &Path, stale_after: Duration) -> Result<Option<RunLockGuard>> {
        std::fs::create_dir_all(lock_dir)?;
        let marker = lock_dir.join(RUN_LOCK_FILE);

        // Two passes at most: one to observe/reclaim, one after reclaiming.
        for attempt in 0..2 {
            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&marker)
            {
                Ok(mut file) => {
                    let _ = writeln!(file, "pid = {}", std::process::id());
                    debug!(marker = %marker.display(), "acquired global run lock");
                    return Ok(Some(RunLockGuard { marker }));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    let age = match marker_age(&marker) {
                        Ok(age) => age,
                        // Marker vanished between the open and the stat:
                        // the previous holder just released, try again.
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                        Err(e) => return Err(Error::Io(e)),
                    };

                    if age < stale_after {
                        debug!(
                            marker = %marker.display(),
                            age_secs = age.as_secs(),
                            "global run lock held by another run"
                        );
                        return Ok(None);
                    }

                    if attempt > 0 {
                        // Reclaimed once already and somebody recreated it:
                        // a live run beat us to it.
                        return Ok(None);
                    }

                    warn!(
                        marker = %marker.display(),
                        age_secs = age.as_secs(),
                        "reclaiming abandoned run lock"
                    );
                    match std::fs::remove_file(&marker) {
                        Ok(()) => {}
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                        Err(e) => return Err(Error::Io(e)),
                    }
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }

        Ok(None)
    }
}

/// RAII guard for the global run lock; removes the marker on drop.
pub struct RunLockGuard {
    marker: PathBuf,
}

impl Drop for RunLockGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.marker) {
            Ok(()) => debug!(marker = %self.marker.display(), "released global run lock"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(marker = %self.marker.display(), error = %e, "failed to release run lock"),
        }
    }
}

/// Outcome of a debounce check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceDecision {
    /// No fresh marker: process the document (marker created/refreshed).
    Proceed,
    /// A fresh marker exists: duplicate trigger, skip this document.
    Skip,
}

/// Per-document debounce lock.
///
/// Markers are keyed by a stable blake3 hash of the document's canonical
/// path, so every spelling of the same path debounces against one marker.
pub struct Debouncer {
    lock_dir: PathBuf,
    window: Duration,
}

impl Debouncer {
    /// Create a debouncer writing markers under `lock_dir`.
    pub fn new(lock_dir: impl Into<PathBuf>, window: Duration) -> Self {
        Self {
            lock_dir: lock_dir.into(),
            window,
        }
    }

    /// Check (and refresh) the debounce marker for `path`.
    ///
    /// Returns [`DebounceDecision::Skip`] when a marker younger than the
    /// window exists, otherwise creates or refreshes the marker and returns
    /// [`DebounceDecision::Proceed`]. Markers are deliberately not removed
    /// at end of run; natural expiry by age is what makes this a debounce.
    pub fn try_debounce(&self, path: &Path) -> Result<DebounceDecision> {
        let marker = self.marker_path(path)?;

        match marker_age(&marker) {
            Ok(age) if age < self.window => {
                debug!(path = %path.display(), age_secs = age.as_secs(), "debounce window active, skipping");
                return Ok(DebounceDecision::Skip);
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(e)),
        }

        std::fs::create_dir_all(&self.lock_dir)?;
        std::fs::File::create(&marker)?;
        Ok(DebounceDecision::Proceed)
    }

    fn marker_path(&self, path: &Path) -> Result<PathBuf> {
        let key = crate::store::canonicalize_key(path)?;
        let digest = blake3::hash(key.as_bytes());
        Ok(self
            .lock_dir
            .join(format!("debounce-{}.lock", hex::encode(digest.as_bytes()))))
    }
}
