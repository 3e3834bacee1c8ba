//! `localStorage`-backed key-value store.
use garden_game::KeyValueStore;
use web_sys::Storage;

use crate::dom;

/// Web-specific garden storage using `localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum WebStorageError {
    #[error("localStorage is unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LocalStorageStore {
    /// Open the window's `localStorage`.
    ///
    /// # Errors
    /// Returns [`WebStorageError::Unavailable`] outside a browser or when storage is disabled.
    pub fn open() -> Result<Self, WebStorageError> {
        dom::local_storage()
            .map(|storage| Self { storage })
            .map_err(|err| WebStorageError::Unavailable(dom::js_error_message(&err)))
    }
}

impl KeyValueStore for LocalStorageStore {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.storage
            .get_item(key)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.storage
            .set_item(key, value)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.storage
            .remove_item(key)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }
}
