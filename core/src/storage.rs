//! Tip Storage
//!
//! The tips file is a single JSON document holding the whole collection. It is
//! read wholesale and overwritten wholesale; there is no append format.
//!
//! The display session re-reads the file on every refresh tick, so a concurrent
//! `tips generate` run becomes visible without restarting the session. Saves go
//! through a sibling temporary file that is synced to disk and then renamed over
//! the target, so a reader never observes a half-written document.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tip::TipCollection;

/// Default file name, placed in the user's home directory
pub const DEFAULT_TIPS_FILE_NAME: &str = ".tips.json";

/// Errors from reading or writing the tips file
#[derive(Debug, Error)]
pub enum StoreError {
    /// The home directory could not be determined
    #[error("failed to get tips file path: home directory not found")]
    NoHomeDir,

    /// The tips file exists but could not be read
    #[error("failed to read tips file {path}: {source}")]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The tips file is not a valid tips document
    #[error("failed to parse tips file {path}: {source}")]
    Parse {
        /// Path that was parsed
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// The collection could not be serialized
    #[error("failed to marshal tips data: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The tips file could not be written
    #[error("failed to write tips file {path}: {source}")]
    Write {
        /// Path that was written
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}

/// Storage backend for the tip collection
///
/// Implementations must treat a missing document as an empty collection.
pub trait TipStore: Send + Sync {
    /// Load the whole collection
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or parsed.
    fn load(&self) -> Result<TipCollection, StoreError>;

    /// Replace the stored collection with `collection`
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be serialized or written.
    fn save(&self, collection: &TipCollection) -> Result<(), StoreError>;
}

/// Tips stored as pretty-printed JSON in a single file
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `~/.tips.json`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoHomeDir`] if the home directory is unknown.
    pub fn in_home_dir() -> Result<Self, StoreError> {
        default_tips_path().map(Self::new).ok_or(StoreError::NoHomeDir)
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the tips file
    ///
    /// Returns `Ok(false)` when there was no file to delete.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool, StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Deleted tips file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

impl TipStore for JsonFileStore {
    fn load(&self) -> Result<TipCollection, StoreError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Tips file not found, starting empty");
                return Ok(TipCollection::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if data.is_empty() {
            return Ok(TipCollection::new());
        }

        let collection: TipCollection =
            serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            count = collection.len(),
            "Loaded tips"
        );
        Ok(collection)
    }

    fn save(&self, collection: &TipCollection) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(collection).map_err(StoreError::Serialize)?;

        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let temp = self.temp_path();
        if let Err(e) = write_synced(&temp, &data) {
            let _ = std::fs::remove_file(&temp);
            return Err(write_err(e));
        }
        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(write_err(e));
        }

        tracing::debug!(
            path = %self.path.display(),
            count = collection.len(),
            "Saved tips"
        );
        Ok(())
    }
}

/// Write `data` to `path` and flush it to disk before returning
fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// `~/.tips.json`, if the home directory is known
#[must_use]
pub fn default_tips_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_TIPS_FILE_NAME))
}
