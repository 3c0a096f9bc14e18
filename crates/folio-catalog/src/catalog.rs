//! Candidate catalog construction.
//!
//! Candidates come from two sources: names of existing topic pages (file
//! stem of every markdown file under the pages directory) and names already
//! referenced inside `[[...]]` markers anywhere in the corpus, whether or
//! not a page for them exists ("virtual references"). The exclusion rules
//! and the descending-length ordering are output contracts the linker
//! depends on.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("reference regex"));

/// Where a candidate was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// An existing topic page in the pages directory.
    Page,
    /// A name referenced in `[[...]]` markers without (necessarily) an
    /// existing page.
    Referenced,
}

/// A linkable topic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The exact text the linker will match.
    pub text: String,
    /// Discovery source.
    pub origin: CandidateOrigin,
}

/// Exclusion rules applied to every discovered name.
///
/// A name is discarded when it case-insensitively equals a reserved name,
/// starts with the external-reference sigil, or carries the highlights
/// prefix marking it as a derivative of another page.
#[derive(Debug, Clone)]
pub struct Exclusions {
    reserved: HashSet<String>,
    sigil: char,
    highlight_prefix: String,
}

/// Task-state markers, temporal/journal markers, meta-pages, and the
/// product name itself: none of these are useful link targets.
const RESERVED_NAMES: &[&str] = &[
    // Task-state markers
    "todo", "doing", "done", "later", "now", "wait", "waiting", "canceled", "cancelled",
    "in-progress",
    // Temporal / journal markers
    "journal", "journals", "january", "february", "march", "april", "may", "june", "july",
    "august", "september", "october", "november", "december", "monday", "tuesday", "wednesday",
    "thursday", "friday", "saturday", "sunday",
    // Meta-pages
    "contents", "card", "notes", "favorites",
    // The product itself
    "folio",
];

impl Default for Exclusions {
    fn default() -> Self {
        Self {
            reserved: RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
            sigil: '@',
            highlight_prefix: "hls__".to_string(),
        }
    }
}

impl Exclusions {
    /// Add an extra reserved name (matched case-insensitively).
    pub fn reserve(&mut self, name: &str) {
        self.reserved.insert(name.to_lowercase());
    }

    /// Whether `name` must be excluded from the catalog.
    pub fn is_excluded(&self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return true;
        }
        let lowered = trimmed.to_lowercase();
        self.reserved.contains(&lowered)
            || trimmed.starts_with(self.sigil)
            || lowered.starts_with(&self.highlight_prefix)
    }
}

/// Summary counts over a built catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    /// Candidates originating from existing pages.
    pub pages: usize,
    /// Candidates originating from bracketed references only.
    pub referenced: usize,
}

/// Builds the candidate set from the vault corpora.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    exclusions: Exclusions,
}

impl CatalogBuilder {
    /// Builder with the default exclusion rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with custom exclusion rules.
    pub fn with_exclusions(exclusions: Exclusions) -> Self {
        Self { exclusions }
    }

    /// Build the candidate set from the pages and journals corpora.
    ///
    /// Pure given the corpora contents: the same files always produce the
    /// same candidate list. Output is de-duplicated by exact text and sorted
    /// by descending text length; ties keep first-seen order (pages before
    /// journal-only references). The ordering is a contract: the linker
    /// relies on it so a longer candidate is attempted before any of its
    /// substrings.
    pub fn build(&self, pages_dir: &Path, journals_dir: &Path) -> Result<Vec<Candidate>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();

        // (1) Existing page names.
        for name in self.page_names(pages_dir)? {
            if self.exclusions.is_excluded(&name) {
                continue;
            }
            if seen.insert(name.clone()) {
                candidates.push(Candidate {
                    text: name,
                    origin: CandidateOrigin::Page,
                });
            }
        }

        // (2) Bracketed references across both corpora.
        for dir in [pages_dir, journals_dir] {
            for name in self.referenced_names(dir)? {
                if self.exclusions.is_excluded(&name) {
                    continue;
                }
                if seen.insert(name.clone()) {
                    candidates.push(Candidate {
                        text: name,
                        origin: CandidateOrigin::Referenced,
                    });
                }
            }
        }

        // (5) Longest first; stable sort keeps first-seen order on ties.
        candidates.sort_by(|a, b| b.text.len().cmp(&a.text.len()));

        debug!(total = candidates.len(), "built reference catalog");
        Ok(candidates)
    }

    /// Summary counts by origin.
    pub fn stats(candidates: &[Candidate]) -> CatalogStats {
        let pages = candidates
            .iter()
            .filter(|c| c.origin == CandidateOrigin::Page)
            .count();
        CatalogStats {
            pages,
            referenced: candidates.len() - pages,
        }
    }

    fn page_names(&self, pages_dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in self.walk_markdown(pages_dir)? {
            if let Some(stem) = entry.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        Ok(names)
    }

    fn referenced_names(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for path in self.walk_markdown(dir)? {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    // One unreadable file never aborts catalog construction.
                    warn!(file = %path.display(), error = %e, "skipping unreadable corpus file");
                    continue;
                }
            };
            for cap in REFERENCE_REGEX.captures_iter(&content) {
                if let Some(inner) = cap.get(1) {
                    names.push(inner.as_str().trim().to_string());
                }
            }
        }
        Ok(names)
    }

    /// Enumerate markdown files under `dir`, sorted for deterministic output.
    fn walk_markdown(&self, dir: &Path) -> Result<Vec<std::path::PathBuf>> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "corpus directory missing, treating as empty");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.path() == Some(dir) {
                        return Err(Error::CorpusUnreadable {
                            dir: dir.display().to_string(),
                            source: e.into(),
                        });
                    }
                    warn!(error = %e, "skipping unreadable corpus entry");
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|e| e.to_str()) == Some("md")
            {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}
