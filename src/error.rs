use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by content discovery and resolution.
///
/// A slug that resolves to nothing is not an error; it is `None`.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown language code: '{0}'")]
    UnknownLanguage(String),
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContentError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
