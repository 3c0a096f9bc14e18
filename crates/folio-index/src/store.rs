//! Persisted processing index.
//!
//! The store is a single TOML file mapping canonical absolute paths to
//! RFC 3339 timestamps — flat, structured, and diff-friendly. It is read
//! fully and rewritten fully on every update; atomicity comes from writing
//! to a temp file in the same directory and renaming over the store.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// The full mapping held by the index store.
pub type IndexMap = BTreeMap<String, DateTime<Utc>>;

/// A persisted mapping from canonical document path to last-processed time.
///
/// Entries are created on first successful processing and overwritten on
/// every subsequent one; nothing deletes them automatically. `upsert` is not
/// synchronized against concurrent writers from other processes — callers
/// must hold the global run lock (see [`crate::lock::RunLock`]) around any
/// write.
#[derive(Debug, Clone)]
pub struct ProcessingIndex {
    store_path: PathBuf,
}

impl ProcessingIndex {
    /// Open an index backed by the store file at `store_path`.
    ///
    /// The file does not need to exist yet; it is created on first write
    /// (or on the first `load`, which resets a missing store to a valid
    /// empty document).
    pub fn open(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }

    /// Path of the backing store file.
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Load the full mapping.
    ///
    /// A missing or structurally invalid store is treated as empty and
    /// immediately rewritten as a valid empty document. This never surfaces
    /// an error to the caller: index corruption must not abort a run.
    pub fn load(&self) -> IndexMap {
        let raw = match std::fs::read_to_string(&self.store_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(store = %self.store_path.display(), "index store missing, starting empty");
                self.reset_empty();
                return IndexMap::new();
            }
            Err(e) => {
                warn!(store = %self.store_path.display(), error = %e, "index store unreadable, resetting to empty");
                self.reset_empty();
                return IndexMap::new();
            }
        };

        match toml::from_str::<IndexMap>(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    store = %self.store_path.display(),
                    error = %e,
                    "index store malformed, resetting to empty"
                );
                self.reset_empty();
                IndexMap::new()
            }
        }
    }

    /// Set or overwrite the entry for `path` and rewrite the whole store.
    ///
    /// The path is canonicalized before storage so the same document reached
    /// via two relative spellings resolves to one entry. The write is
    /// all-or-nothing: a crash mid-write cannot leave a half-written store.
    pub fn upsert(&self, path: &Path, timestamp: DateTime<Utc>) -> Result<()> {
        let canonical = canonicalize_key(path)?;
        let mut map = self.load();
        map.insert(canonical, timestamp);
        self.write_atomic(&map)
    }

    /// Rewrite the store as a valid empty document, best-effort.
    fn reset_empty(&self) {
        if let Err(e) = self.write_atomic(&IndexMap::new()) {
            warn!(store = %self.store_path.display(), error = %e, "failed to reset index store");
        }
    }

    fn write_atomic(&self, map: &IndexMap) -> Result<()> {
        let parent = self
            .store_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&parent)?;

        let serialized = toml::to_string(map)?;
        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(serialized.as_bytes())?;
        tmp.persist(&self.store_path)
            .map_err(|e| Error::Persist(e.to_string()))?;
        Ok(())
    }
}

/// Canonicalize a document path into its index key form.
pub(crate) fn canonicalize_key(path: &Path) -> Result<String> {
    let canonical = std::fs::canonicalize(path).map_err(|source| Error::Canonicalize {
        path: path.display().to_string(),
        source,
    })?;
    Ok(canonical.to_string_lossy().into_owned())
}
