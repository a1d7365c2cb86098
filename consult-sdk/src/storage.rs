//! Local durable storage
//!
//! `KeyValueStore` is the string key/value capability ratings fall back to
//! (the equivalent of browser local storage). `RatingStore` keeps a bounded
//! JSON list under one key: most recent last, oldest evicted first.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{debug, warn};

use crate::error::{Result, ServiceError};
use crate::services::rating::{EnrichedRating, StoredRating};

/// Default ring buffer capacity
pub const DEFAULT_CAPACITY: usize = 50;

/// String key/value persistence
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| ServiceError::storage("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ServiceError::storage("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::storage(format!("Failed to read {}: {}", path.display(), e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            ServiceError::storage(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        // Write then rename so a crash never leaves a half-written list
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| ServiceError::storage(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// Bounded ring buffer of undelivered ratings
///
/// Appends are a read-modify-write under one lock, so there is a single
/// writer per append.
pub struct RatingStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl RatingStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self::with_capacity(backend, key, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(
        backend: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            backend,
            key: key.into(),
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All stored ratings, oldest first
    pub fn load(&self) -> Result<Vec<StoredRating>> {
        match self.backend.get(&self.key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(ServiceError::from),
            None => Ok(Vec::new()),
        }
    }

    /// Append a rating, evicting the oldest beyond capacity; returns the new length
    pub fn append(&self, rating: EnrichedRating) -> Result<usize> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ServiceError::storage("rating store lock poisoned"))?;

        // A failed read leaves the stored list untouched
        let existing = self
            .backend
            .get(&self.key)
            .map_err(|e| e.with_context_value("key", &self.key))?;

        let mut ratings: Vec<StoredRating> = match existing {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding corrupt stored ratings under {}: {}", self.key, e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        ratings.push(StoredRating {
            rating,
            stored_at: Utc::now(),
        });

        if ratings.len() > self.capacity {
            let overflow = ratings.len() - self.capacity;
            ratings.drain(..overflow);
        }

        let serialized = serde_json::to_string(&ratings)?;
        self.backend.set(&self.key, &serialized)?;

        debug!("Rating stored locally under {} ({} held)", self.key, ratings.len());
        Ok(ratings.len())
    }

    /// Remove every stored rating
    pub fn clear(&self) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ServiceError::storage("rating store lock poisoned"))?;
        self.backend.set(&self.key, "[]")
    }
}
