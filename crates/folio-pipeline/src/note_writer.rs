//! Markdown note writer.

use async_trait::async_trait;
use folio_core::{CoreError, CoreResult, NoteDraft, NoteWriter};
use std::path::PathBuf;
use tracing::debug;

/// Writes one markdown note per processed document into the pages
/// directory. Reprocessing a document overwrites its note.
pub struct MarkdownNoteWriter {
    pages_dir: PathBuf,
}

impl MarkdownNoteWriter {
    /// Writer targeting `pages_dir`.
    pub fn new(pages_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
        }
    }

    /// Derive a safe note filename from a title.
    fn note_path(&self, title: &str) -> PathBuf {
        let safe: String = title
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
            .collect();
        self.pages_dir.join(format!("{safe}.md"))
    }
}

#[async_trait]
impl NoteWriter for MarkdownNoteWriter {
    async fn write(&self, note: &NoteDraft) -> CoreResult<PathBuf> {
        std::fs::create_dir_all(&self.pages_dir)?;
        let path = self.note_path(&note.title);

        let content = format!(
            "---\ntitle: {}\nsource: {}\ndate: {}\n---\n\n{}\n",
            note.title,
            note.source.display(),
            note.date.to_rfc3339(),
            note.body
        );
        std::fs::write(&path, content).map_err(|e| {
            CoreError::NoteWrite(format!("cannot write '{}': {}", path.display(), e))
        })?;

        debug!(note = %path.display(), "wrote note");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_note_with_header_and_body() {
        let dir = TempDir::new().unwrap();
        let writer = MarkdownNoteWriter::new(dir.path().join("pages"));

        let draft = NoteDraft::new(
            "Rome",
            PathBuf::from("/scans/Rome.pdf"),
            Utc::now(),
            "The [[Aqueducts]] of [[Rome]].".to_string(),
        );
        let path = writer.write(&draft).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("---\ntitle: Rome\n"));
        assert!(content.contains("source: /scans/Rome.pdf"));
        assert!(content.ends_with("The [[Aqueducts]] of [[Rome]].\n"));
    }

    #[tokio::test]
    async fn reprocessing_overwrites_existing_note() {
        let dir = TempDir::new().unwrap();
        let writer = MarkdownNoteWriter::new(dir.path());

        let first = NoteDraft::new("Rome", PathBuf::from("a.pdf"), Utc::now(), "one".into());
        let second = NoteDraft::new("Rome", PathBuf::from("a.pdf"), Utc::now(), "two".into());
        let path_a = writer.write(&first).await.unwrap();
        let path_b = writer.write(&second).await.unwrap();

        assert_eq!(path_a, path_b);
        assert!(std::fs::read_to_string(&path_b).unwrap().contains("two"));
    }

    #[tokio::test]
    async fn path_separators_in_titles_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let writer = MarkdownNoteWriter::new(dir.path());

        let draft = NoteDraft::new("a/b", PathBuf::from("x.pdf"), Utc::now(), String::new());
        let path = writer.write(&draft).await.unwrap();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("a-b.md"));
    }
}
