use crate::domain::errors::{AppError, AppResult};
use crate::domain::preferences::KeyValueStorage;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// `window.localStorage`. Every failure (no window, storage disabled, quota)
/// comes back as a storage error.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> AppResult<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| AppError::StorageError("Window not available".to_string()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(AppError::StorageError("localStorage disabled".to_string())),
            Err(e) => Err(AppError::StorageError(format!("localStorage denied: {e:?}"))),
        }
    }
}

impl KeyValueStorage for LocalStorageBackend {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| AppError::StorageError(format!("getItem({key}) failed: {e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| AppError::StorageError(format!("setItem({key}) failed: {e:?}")))
    }
}

/// Shared in-memory key/value map. Clones see the same entries, which lets
/// tests reopen a store to simulate a page reload.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` verbatim, e.g. a corrupt entry.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        self.insert_raw(key, value);
        Ok(())
    }
}
