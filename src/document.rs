use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::{DocumentError, DocumentResult};

const TEXT_EXTENSIONS: &[&str] = &["md", "markdown", "txt", "text", "rst", "org", "adoc"];

const CODE_EXTENSIONS: &[&str] = &[
    "rs", "c", "h", "cc", "cpp", "hpp", "cs", "go", "java", "kt", "js", "mjs", "ts", "tsx",
    "jsx", "py", "rb", "php", "lua", "sh", "bash", "zsh", "fish", "ps1", "sql", "html", "css",
    "scss", "json", "toml", "yaml", "yml", "xml", "swift", "scala", "hs", "ml", "ex", "exs",
    "clj", "el", "vim", "r", "dart", "zig", "nim", "pl", "makefile", "dockerfile",
];

/// How much of a file is inspected for NUL bytes before treating it as binary
const BINARY_SNIFF_LEN: usize = 8192;

/// Content type of an open note; decides whether find is available and
/// which match handler serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentKind {
    #[default]
    Text,
    Code,
    Other,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .or_else(|| path.file_name().filter(|_| path.extension().is_none()))
            .map(|e| e.to_string_lossy().to_lowercase());

        match ext.as_deref() {
            None => DocumentKind::Text,
            Some(ext) if TEXT_EXTENSIONS.contains(&ext) => DocumentKind::Text,
            Some(ext) if CODE_EXTENSIONS.contains(&ext) => DocumentKind::Code,
            // A bare file name without a dot, like `README` or `NOTES`
            Some(_) if path.extension().is_none() => DocumentKind::Text,
            Some(_) => DocumentKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Text => "text",
            DocumentKind::Code => "code",
            DocumentKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub read_only: bool,
    lines: Arc<[String]>,
    revision: u64,
    modified: Option<SystemTime>,
}

impl Document {
    pub fn load(path: &Path) -> DocumentResult<Self> {
        let (lines, modified, read_only) = read_note(path)?;
        let kind = DocumentKind::from_path(path);
        tracing::debug!(path = %path.display(), kind = kind.label(), read_only, "document loaded");

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            read_only,
            lines,
            revision: 0,
            modified,
        })
    }

    /// In-memory document with no backing file; never reloads.
    pub fn from_text(name: &str, kind: DocumentKind, content: &str) -> Self {
        Self {
            path: PathBuf::from(name),
            kind,
            read_only: false,
            lines: split_lines(content),
            revision: 0,
            modified: None,
        }
    }

    /// Cheap shared copy of the content for the find worker.
    pub fn snapshot(&self) -> Arc<[String]> {
        Arc::clone(&self.lines)
    }

    /// Bumped every time the content changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn title(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Syntax token used to pick a highlighter for code documents.
    pub fn language(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "txt".to_string())
    }

    /// Re-read the file if its modification time moved. Returns `true`
    /// when the content or the read-only state changed.
    pub fn reload_if_changed(&mut self) -> DocumentResult<bool> {
        if self.modified.is_none() {
            return Ok(false);
        }
        let Ok(metadata) = fs::metadata(&self.path) else {
            return Ok(false);
        };

        // chmod leaves the mtime alone
        let read_only = metadata.permissions().readonly();
        let access_changed = read_only != self.read_only;
        if access_changed {
            tracing::info!(path = %self.path.display(), read_only, "note permissions changed");
            self.read_only = read_only;
        }

        let modified = metadata.modified().ok();
        if modified.is_none() || modified == self.modified {
            return Ok(access_changed);
        }

        let (lines, modified, read_only) = read_note(&self.path)?;
        self.modified = modified;
        self.read_only = read_only;
        if lines == self.lines {
            return Ok(access_changed);
        }

        self.lines = lines;
        self.revision += 1;
        tracing::info!(path = %self.path.display(), revision = self.revision, "note content reloaded");
        Ok(true)
    }

    #[cfg(test)]
    pub fn replace_content(&mut self, content: &str) {
        self.lines = split_lines(content);
        self.revision += 1;
    }
}

fn read_note(path: &Path) -> DocumentResult<(Arc<[String]>, Option<SystemTime>, bool)> {
    let io_err = |source| DocumentError::Io { path: path.to_path_buf(), source };

    let bytes = fs::read(path).map_err(io_err)?;
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(DocumentError::Binary(path.to_path_buf()));
    }

    let metadata = fs::metadata(path).map_err(io_err)?;
    let content = String::from_utf8_lossy(&bytes);

    Ok((
        split_lines(&content),
        metadata.modified().ok(),
        metadata.permissions().readonly(),
    ))
}

fn split_lines(content: &str) -> Arc<[String]> {
    let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    if lines.is_empty() {
        Arc::from(vec![String::new()])
    } else {
        Arc::from(lines)
    }
}
