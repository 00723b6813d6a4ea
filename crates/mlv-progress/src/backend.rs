//! Key-value backends for progress state.
//!
//! A backend stores opaque string values under string keys, the way a
//! browser's local storage does. [`MemoryBackend`] keeps values in process;
//! [`FileBackend`] writes one JSON file per key:
//!
//! ```text
//! {dir}/
//! +-- mlv_done.json      # key "mlv:done"
//! +-- mlv_quiz.json      # key "mlv:quiz"
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::ProgressError;

/// File extension of persisted keys.
pub(crate) const EXTENSION: &str = "json";

/// Storage for raw progress values.
///
/// `get` never fails: an unreadable value is reported as absent.
pub trait ProgressBackend: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), ProgressError>;
}

/// In-process backend. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a raw value, bypassing the store's encoding.
    #[must_use]
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        self
    }
}

impl ProgressBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Directory-backed store with one file per key.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// concurrent reader sees either the old or the new value.
#[derive(Clone, Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", file_stem(key)))
    }
}

impl ProgressBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to read progress file: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        fs::create_dir_all(&self.dir).map_err(|e| ProgressError::write(key, e))?;

        let path = self.key_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(|e| ProgressError::write(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            ProgressError::write(key, e)
        })?;

        tracing::debug!(key, path = %path.display(), "progress written");
        Ok(())
    }
}

/// Map a key to a portable file stem (`mlv:done` -> `mlv_done`).
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
