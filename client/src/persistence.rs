use web_sys::Window;

use tackpad_core::{Storage, StorageError};

pub const STORAGE_KEY: &str = "tackpad:note";

/// `localStorage`-backed implementation of the core storage port. The
/// whole note lives as one JSON string under a fixed key.
pub struct LocalStorage {
    area: web_sys::Storage,
}

impl LocalStorage {
    pub fn from_window(window: &Window) -> Result<Self, StorageError> {
        let area = window
            .local_storage()
            .map_err(|_| StorageError::Unavailable("localStorage access denied".into()))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is not exposed".into()))?;
        Ok(Self { area })
    }
}

impl Storage for LocalStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.area
            .get_item(STORAGE_KEY)
            .map_err(|_| StorageError::Load("localStorage read failed".into()))
    }

    fn save(&self, data: &str) -> Result<(), StorageError> {
        self.area
            .set_item(STORAGE_KEY, data)
            .map_err(|_| StorageError::Save("localStorage write failed".into()))
    }
}
