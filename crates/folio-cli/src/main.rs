//! folio entry point.
//!
//! Exit-code policy: 0 on normal completion, including "nothing to do" and
//! "skipped because another run holds the lock"; non-zero only for
//! unrecoverable setup failures (missing external tool, missing credential,
//! missing vault directory, unreadable corpus).

mod cli;
mod config;

use anyhow::{bail, Context, Result};
use clap::Parser;
use folio_core::Rasterizer;
use folio_pipeline::{MarkdownNoteWriter, PipelineConfig, PipelineDriver, RunOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use cli::{Cli, Commands};
use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = format!("folio={log_level},folio_cli={log_level},folio_pipeline={log_level},folio_index={log_level},folio_catalog={log_level},folio_ocr={log_level}");
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { path, force } => run(config, path, force).await,
    }
}

async fn run(config: CliConfig, path: Option<PathBuf>, force: bool) -> Result<()> {
    // Setup validation: everything here is fatal before any document is
    // touched.
    if !config.vault.root_exists() {
        bail!(
            "vault directory '{}' does not exist",
            config.vault.root.display()
        );
    }

    let api_key = resolve_api_key(&config.ocr)?;

    let rasterizer = Arc::new(folio_ocr::PdfRasterizer::new(
        config.raster.tool.clone(),
        config.raster.dpi,
    ));
    rasterizer
        .preflight()
        .await
        .context("rasterizer preflight failed")?;

    let scope = path.unwrap_or_else(|| config.vault.root.clone());
    let documents = collect_documents(&scope)?;
    if documents.is_empty() {
        info!(scope = %scope.display(), "no documents to process");
        return Ok(());
    }
    debug!(count = documents.len(), "documents in scope");

    let ocr = Arc::new(folio_ocr::HttpOcrEngine::new(
        config.ocr.endpoint.clone(),
        api_key,
        config.ocr.timeout_secs,
    ));
    let writer = Arc::new(MarkdownNoteWriter::new(config.vault.pages_path()));

    let driver = PipelineDriver::new(
        ocr,
        rasterizer,
        writer,
        config.vault.clone(),
        PipelineConfig {
            force,
            thresholds: config.thresholds,
        },
    );

    match driver.run(&documents).await? {
        RunOutcome::SkippedLocked => Ok(()),
        RunOutcome::Completed(summary) => {
            info!(
                processed = summary.processed,
                skipped = summary.skipped,
                failed = summary.failed,
                "folio run finished"
            );
            Ok(())
        }
    }
}

/// Resolve the bearer credential named by the configuration, if any.
///
/// A configured variable that is absent from the environment is a setup
/// error; no configured variable means unauthenticated requests.
fn resolve_api_key(ocr: &config::OcrSection) -> Result<Option<String>> {
    match &ocr.api_key_env {
        Some(var) => match std::env::var(var) {
            Ok(key) => Ok(Some(key)),
            Err(_) => Err(folio_core::OcrError::MissingCredential(var.clone()).into()),
        },
        None => Ok(None),
    }
}

/// Resolve the run scope into a list of documents.
///
/// A file is taken as-is; a directory is scanned recursively for supported
/// documents, sorted for deterministic processing order.
fn collect_documents(scope: &Path) -> Result<Vec<PathBuf>> {
    if scope.is_file() {
        return Ok(vec![scope.to_path_buf()]);
    }
    if !scope.is_dir() {
        bail!("'{}' is neither a document nor a directory", scope.display());
    }

    let mut documents: Vec<PathBuf> = walkdir::WalkDir::new(scope)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported_document(path))
        .collect();
    documents.sort();
    Ok(documents)
}

fn is_supported_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn collect_single_document() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("scan.pdf");
        std::fs::write(&doc, b"%PDF").unwrap();

        assert_eq!(collect_documents(&doc).unwrap(), vec![doc]);
    }

    #[test]
    fn collect_scans_directories_recursively_and_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("nested").join("a.PDF"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("notes.md"), "not a scan").unwrap();

        let docs = collect_documents(dir.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].ends_with("b.pdf"));
        assert!(docs[1].ends_with("nested/a.PDF"));
    }

    #[test]
    fn missing_scope_is_a_setup_error() {
        assert!(collect_documents(Path::new("/no/such/scope")).is_err());
    }

    #[test]
    fn no_configured_credential_means_unauthenticated() {
        let ocr = config::OcrSection::default();
        assert!(resolve_api_key(&ocr).unwrap().is_none());
    }

    #[test]
    fn present_credential_is_read_from_the_environment() {
        std::env::set_var("FOLIO_TEST_OCR_KEY_PRESENT", "sekrit");
        let ocr = config::OcrSection {
            api_key_env: Some("FOLIO_TEST_OCR_KEY_PRESENT".to_string()),
            ..config::OcrSection::default()
        };
        assert_eq!(resolve_api_key(&ocr).unwrap().as_deref(), Some("sekrit"));
    }

    #[test]
    fn missing_configured_credential_is_a_setup_error() {
        let ocr = config::OcrSection {
            api_key_env: Some("FOLIO_TEST_OCR_KEY_ABSENT".to_string()),
            ..config::OcrSection::default()
        };
        let err = resolve_api_key(&ocr).unwrap_err();
        assert!(err.to_string().contains("FOLIO_TEST_OCR_KEY_ABSENT"));
    }
}
