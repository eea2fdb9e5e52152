//! Scalar high score storage
//!
//! Features:
//! - One integer per game key, stored as a decimal string
//! - In-memory backend for native runs and tests
//! - LocalStorage backend on web
//! - Corrupt values are reported, never fatal

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to read key `{key}`")]
    Read { key: String },
    #[error("failed to write key `{key}`")]
    Write { key: String },
    #[error("stored value `{value}` for key `{key}` is not a score")]
    Corrupt { key: String, value: String },
}

/// Key/value backend holding one score per key
pub trait ScoreStore {
    /// Read the stored score (None when absent)
    fn load(&self, key: &str) -> Result<Option<u64>, StorageError>;
    /// Overwrite the stored score
    fn save(&mut self, key: &str, value: u64) -> Result<(), StorageError>;
}

/// Parse a stored decimal string
pub(crate) fn parse_score(key: &str, raw: &str) -> Result<u64, StorageError> {
    raw.trim().parse::<u64>().map_err(|_| StorageError::Corrupt {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

/// Process-lifetime storage (native builds, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a raw string under `key` (lets tests plant corrupt data)
    pub fn insert_raw(&mut self, key: &str, raw: &str) {
        self.values.insert(key.to_string(), raw.to_string());
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<u64>, StorageError> {
        self.values
            .get(key)
            .map(|raw| parse_score(key, raw))
            .transpose()
    }

    fn save(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn load(&self, key: &str) -> Result<Option<u64>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        (**self).save(key, value)
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<u64>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        (**self).save(key, value)
    }
}
