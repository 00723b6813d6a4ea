//! Error type for progress persistence.

use std::io;

/// Error raised when progress state cannot be persisted or watched.
///
/// Reads never fail: missing or malformed state is treated as empty.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Writing a key to the backend failed.
    #[error("failed to write progress key `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
    /// Serializing progress state failed.
    #[error("failed to encode progress state: {0}")]
    Encode(#[from] serde_json::Error),
    /// Setting up the directory watcher failed.
    #[error("failed to watch progress directory: {0}")]
    Watch(#[from] notify::Error),
}

impl ProgressError {
    pub(crate) fn write(key: &str, source: io::Error) -> Self {
        Self::Write {
            key: key.to_owned(),
            source,
        }
    }
}
