//! Configuration file loading.
//!
//! `folio.toml` is looked up from an explicit `--config` flag, then the
//! working directory, then the user configuration directory. A missing file
//! falls back to defaults (vault rooted at the working directory); a
//! present-but-invalid file is a setup error.

use anyhow::{Context, Result};
use folio_core::{Thresholds, VaultConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "folio.toml";

/// Full CLI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Vault location and layout.
    pub vault: VaultConfig,
    /// OCR provider settings.
    #[serde(default)]
    pub ocr: OcrSection,
    /// Rasterizer settings.
    #[serde(default)]
    pub raster: RasterSection,
    /// Staleness and lock time windows.
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// `[ocr]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrSection {
    /// Endpoint the page images are POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the bearer credential. When set, the
    /// variable must be present at startup (missing credential is a setup
    /// error); when unset, requests are sent unauthenticated.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Per-page request timeout.
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8971/v1/ocr".to_string()
}

fn default_ocr_timeout() -> u64 {
    120
}

impl Default for OcrSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: None,
            timeout_secs: default_ocr_timeout(),
        }
    }
}

/// `[raster]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RasterSection {
    /// Rasterizer binary.
    #[serde(default = "default_tool")]
    pub tool: String,
    /// Render resolution.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_tool() -> String {
    "pdftoppm".to_string()
}

fn default_dpi() -> u32 {
    300
}

impl Default for RasterSection {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            dpi: default_dpi(),
        }
    }
}

impl CliConfig {
    /// Load configuration, preferring `explicit` when given.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let cwd_config = PathBuf::from(CONFIG_FILE);
        if cwd_config.is_file() {
            return Self::from_file(&cwd_config);
        }

        if let Some(user_config) = dirs::config_dir().map(|d| d.join("folio").join(CONFIG_FILE)) {
            if user_config.is_file() {
                return Self::from_file(&user_config);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::defaults_in_cwd())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        debug!(config = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn defaults_in_cwd() -> Self {
        Self {
            vault: VaultConfig::new("."),
            ocr: OcrSection::default(),
            raster: RasterSection::default(),
            thresholds: Thresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: CliConfig = toml::from_str(r#"[vault]
root = "/data/vault""#)
            .unwrap();
        assert_eq!(config.ocr.endpoint, "http://127.0.0.1:8971/v1/ocr");
        assert_eq!(config.raster.tool, "pdftoppm");
        assert_eq!(config.thresholds.grace_secs, 5);
        assert!(config.ocr.api_key_env.is_none());
    }

    #[test]
    fn full_config_round_trips() {
        let config: CliConfig = toml::from_str(
            r#"
[vault]
root = "/data/vault"
pages_dir = "topics"

[ocr]
endpoint = "https://ocr.example/v2"
api_key_env = "MY_OCR_KEY"
timeout_secs = 30

[raster]
dpi = 150

[thresholds]
debounce_secs = 10
"#,
        )
        .unwrap();
        assert_eq!(config.vault.pages_dir, "topics");
        assert_eq!(config.ocr.api_key_env.as_deref(), Some("MY_OCR_KEY"));
        assert_eq!(config.raster.dpi, 150);
        assert_eq!(config.thresholds.debounce_secs, 10);
        assert_eq!(config.thresholds.lock_stale_secs, 600);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = CliConfig::load(Some(Path::new("/no/such/folio.toml"))).unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }
}
