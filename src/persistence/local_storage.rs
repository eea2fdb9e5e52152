//! Browser LocalStorage backend

use super::{ScoreStore, StorageError, parse_score};

/// LocalStorage-backed score store
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// Open the window's LocalStorage (fails in private mode / sandboxed frames)
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<u64>, StorageError> {
        let raw = self.storage.get_item(key).map_err(|_| StorageError::Read {
            key: key.to_string(),
        })?;
        raw.map(|raw| parse_score(key, &raw)).transpose()
    }

    fn save(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        self.storage
            .set_item(key, &value.to_string())
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }
}
