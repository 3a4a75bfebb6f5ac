use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to load persisted note: {0}")]
    Load(String),
    #[error("failed to save note: {0}")]
    Save(String),
}

/// A single persisted string slot under a key owned by the adapter.
/// `load` returns `Ok(None)` when nothing has been saved yet.
pub trait Storage {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, data: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for std::rc::Rc<S> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, data: &str) -> Result<(), StorageError> {
        (**self).save(data)
    }
}

/// In-memory slot for tests and headless use.
#[derive(Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(data: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(data.into())),
        }
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, data: &str) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(data.to_string());
        Ok(())
    }
}

/// One file holding the persisted document.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::Load(error.to_string())),
        }
    }

    fn save(&self, data: &str) -> Result<(), StorageError> {
        std::fs::write(&self.path, data).map_err(|error| StorageError::Save(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        storage.save("{\"id\":\"n\"}").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("{\"id\":\"n\"}"));
    }

    #[test]
    fn file_storage_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("note.json"));
        assert!(storage.load().unwrap().is_none());
        storage.save("{\"id\":\"n\"}").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("{\"id\":\"n\"}"));
    }

    #[test]
    fn file_storage_surfaces_io_failures() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("missing").join("note.json"));
        assert!(matches!(storage.save("x"), Err(StorageError::Save(_))));
    }
}
