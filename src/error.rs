use std::path::PathBuf;

use thiserror::Error;

/// Errors a match handler can report for a single find request.
///
/// None of these escape the find coordinator: they are logged and shown
/// as zero matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FindError {
    #[error("document is not ready for searching")]
    DocumentNotReady,

    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),
}

pub type FindResult<T> = Result<T, FindError>;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} does not look like a text file")]
    Binary(PathBuf),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
