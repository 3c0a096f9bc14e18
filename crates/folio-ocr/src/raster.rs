//! External-tool rasterizer.
//!
//! Shells out to `pdftoppm` (poppler) to turn a source document into
//! per-page PNG images. The tool's absence is a setup error surfaced by
//! `preflight` before any document is touched.

use async_trait::async_trait;
use folio_core::{OcrError, OcrResult, PageImage, Rasterizer};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

const DEFAULT_TOOL: &str = "pdftoppm";
const DEFAULT_DPI: u32 = 300;

/// Rasterizes PDF documents via an external poppler binary.
pub struct PdfRasterizer {
    tool: String,
    dpi: u32,
}

impl Default for PdfRasterizer {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            dpi: DEFAULT_DPI,
        }
    }
}

impl PdfRasterizer {
    /// Rasterizer using a specific tool binary and render resolution.
    pub fn new(tool: impl Into<String>, dpi: u32) -> Self {
        Self {
            tool: tool.into(),
            dpi,
        }
    }
}

#[async_trait]
impl Rasterizer for PdfRasterizer {
    async fn rasterize(&self, document: &Path) -> OcrResult<Vec<PageImage>> {
        let workdir = tempfile::tempdir()?;
        let prefix = workdir.path().join("page");

        let output = Command::new(&self.tool)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(document)
            .arg(&prefix)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => OcrError::MissingTool(self.tool.clone()),
                _ => OcrError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Provider(format!(
                "{} failed for {}: {}",
                self.tool,
                document.display(),
                stderr.trim()
            )));
        }

        // pdftoppm names output page-1.png, page-2.png, ...; zero padding
        // varies with page count, so sort by filename for page order.
        let mut outputs: Vec<_> = std::fs::read_dir(workdir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
            .collect();
        outputs.sort();

        let mut pages = Vec::with_capacity(outputs.len());
        for (i, path) in outputs.iter().enumerate() {
            pages.push(PageImage::new(i + 1, std::fs::read(path)?));
        }

        debug!(document = %document.display(), pages = pages.len(), "rasterized");
        Ok(pages)
    }

    async fn preflight(&self) -> OcrResult<()> {
        let result = Command::new(&self.tool).arg("-v").output().await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::MissingTool(self.tool.clone()))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}
