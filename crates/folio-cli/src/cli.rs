//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ingest scanned documents into cross-linked markdown notes.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./folio.toml, then the
    /// user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process scanned documents into linked notes
    Run {
        /// A single document, or a directory to scan for supported
        /// documents; defaults to the vault root
        path: Option<PathBuf>,

        /// Reprocess documents even when the index says they are current
        #[arg(long)]
        force: bool,
    },
}
