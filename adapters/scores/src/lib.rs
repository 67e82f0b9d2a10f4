#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistence of per-level best scores.
//!
//! The whole score book is stored as a single JSON blob under
//! [`STATS_KEY`]. Every update rewrites the blob synchronously, so a process
//! that exits right after a win keeps the new best score.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use thiserror::Error;
use unblock_jam_core::{LevelIndex, ScoreBook};

/// Key under which the score book blob is stored.
pub const STATS_KEY: &str = "level_stats/level_stats_map";

const TEMP_SUFFIX: &str = "tmp";

/// Errors surfaced by score persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A blob could not be read from or written to disk.
    #[error("could not access blob at {path}")]
    Io {
        /// Location of the blob on disk.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The score book could not be encoded.
    #[error("could not encode the score book")]
    Encode(#[from] serde_json::Error),
    /// The key cannot be mapped onto a storage location.
    #[error("blob key `{0}` is not a valid storage key")]
    InvalidKey(String),
}

/// Key-value storage for opaque blobs.
pub trait BlobStore {
    /// Reads the blob stored under `key`, returning `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the blob stored under `key`.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-memory blob store, mostly useful for tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let _ = self.blobs.insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}

/// Blob store that keeps one file per key below a root directory.
///
/// Key segments separated by `/` become nested directories. Writes go to a
/// sibling temporary file that is then renamed over the target, so readers see
/// either the previous or the new blob.
#[derive(Clone, Debug)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StoreError::InvalidKey(key.to_owned()));
            }
            path.push(segment);
        }
        let _ = path.set_extension("json");
        Ok(path)
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let temp = path.with_extension(TEMP_SUFFIX);
        fs::write(&temp, value).map_err(|source| StoreError::Io {
            path: temp.clone(),
            source,
        })?;
        fs::rename(&temp, &path).map_err(|source| StoreError::Io { path, source })
    }
}

/// Best-score repository layered over a [`BlobStore`].
#[derive(Debug)]
pub struct ScoreStore<S> {
    store: S,
}

impl<S: BlobStore> ScoreStore<S> {
    /// Wraps a blob store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Gives access to the underlying blob store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the persisted score book.
    ///
    /// A missing blob yields an empty book. A blob that does not decode is
    /// logged and also treated as empty; the next successful update replaces
    /// it.
    pub fn stats(&self) -> Result<ScoreBook, StoreError> {
        let Some(bytes) = self.store.get(STATS_KEY)? else {
            return Ok(ScoreBook::new());
        };
        match serde_json::from_slice(&bytes) {
            Ok(book) => Ok(book),
            Err(error) => {
                tracing::warn!(%error, key = STATS_KEY, "discarding unreadable score book");
                Ok(ScoreBook::new())
            }
        }
    }

    /// Records `score` for `level` when it beats the stored best.
    ///
    /// Returns whether the book changed. Nothing is written when the level
    /// already has an equal or lower best score.
    pub fn update_best_score(
        &mut self,
        level: LevelIndex,
        score: u32,
    ) -> Result<bool, StoreError> {
        let mut book = self.stats()?;
        if !book.record(level, score) {
            return Ok(false);
        }
        let bytes = serde_json::to_vec(&book)?;
        self.store.put(STATS_KEY, &bytes)?;
        tracing::info!(level = level.get(), score, "stored new best score");
        Ok(true)
    }
}
