//! Configuration types shared by the pipeline and the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Location of the vault and its well-known subdirectories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault root directory.
    pub root: PathBuf,
    /// Directory of topic pages, relative to the root.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,
    /// Directory of dated journal entries, relative to the root.
    #[serde(default = "default_journals_dir")]
    pub journals_dir: String,
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_journals_dir() -> String {
    "journals".to_string()
}

impl VaultConfig {
    /// Create a config rooted at `root` with the default layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pages_dir: default_pages_dir(),
            journals_dir: default_journals_dir(),
        }
    }

    /// Absolute path of the pages directory.
    pub fn pages_path(&self) -> PathBuf {
        self.root.join(&self.pages_dir)
    }

    /// Absolute path of the journals directory.
    pub fn journals_path(&self) -> PathBuf {
        self.root.join(&self.journals_dir)
    }

    /// Directory holding folio's internal state (index, lock markers).
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(".folio")
    }

    /// Path of the processing index store.
    pub fn index_path(&self) -> PathBuf {
        self.state_dir().join("index.toml")
    }

    /// Directory holding lock markers.
    pub fn lock_dir(&self) -> PathBuf {
        self.state_dir().join("locks")
    }

    /// Whether the vault root exists on disk.
    pub fn root_exists(&self) -> bool {
        Path::new(&self.root).is_dir()
    }
}

/// Tunable time windows for staleness checking and lock coordination.
///
/// These are empirically tuned magnitudes, not exact contracts; they are
/// threaded through from configuration rather than hard-coded at call sites.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// Grace window absorbing clock skew and slow writes when comparing a
    /// document's mtime against its last-processed timestamp.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
    /// Age after which a global run lock is considered abandoned.
    #[serde(default = "default_lock_stale_secs")]
    pub lock_stale_secs: u64,
    /// Window during which repeated triggers for one document are suppressed
    /// as duplicates.
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
}

fn default_grace_secs() -> u64 {
    5
}

fn default_lock_stale_secs() -> u64 {
    600
}

fn default_debounce_secs() -> u64 {
    30
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            grace_secs: default_grace_secs(),
            lock_stale_secs: default_lock_stale_secs(),
            debounce_secs: default_debounce_secs(),
        }
    }
}

impl Thresholds {
    /// Grace window as a `Duration`.
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    /// Run-lock staleness threshold as a `Duration`.
    pub fn lock_stale(&self) -> Duration {
        Duration::from_secs(self.lock_stale_secs)
    }

    /// Debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_paths_derive_from_root() {
        let vault = VaultConfig::new("/tmp/vault");
        assert_eq!(vault.pages_path(), PathBuf::from("/tmp/vault/pages"));
        assert_eq!(vault.journals_path(), PathBuf::from("/tmp/vault/journals"));
        assert_eq!(vault.index_path(), PathBuf::from("/tmp/vault/.folio/index.toml"));
        assert_eq!(vault.lock_dir(), PathBuf::from("/tmp/vault/.folio/locks"));
    }

    #[test]
    fn thresholds_default_and_partial_deserialize() {
        let t = Thresholds::default();
        assert_eq!(t.grace(), Duration::from_secs(5));
        assert_eq!(t.lock_stale(), Duration::from_secs(600));
        assert_eq!(t.debounce(), Duration::from_secs(30));

        // Omitted fields fall back to defaults.
        let t: Thresholds = toml::from_str("grace_secs = 2").unwrap();
        assert_eq!(t.grace_secs, 2);
        assert_eq!(t.lock_stale_secs, 600);
    }

    #[test]
    fn vault_config_deserializes_with_default_layout() {
        let vault: VaultConfig = toml::from_str(r#"root = "/data/vault""#).unwrap();
        assert_eq!(vault.pages_dir, "pages");
        assert_eq!(vault.journals_dir, "journals");
    }
}
