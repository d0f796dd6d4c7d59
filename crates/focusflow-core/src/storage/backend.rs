//! Persistence channels for the state document.
//!
//! A backend moves one opaque string in and out of storage under a fixed
//! key. It does not interpret the document; see [`super::document`].

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::StorageError;

/// Fixed storage key of the state document.
pub const STATE_KEY: &str = "focusflow_data";

/// Read/write channel for the serialized state.
pub trait StateBackend {
    /// The stored document, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the stored document.
    fn save(&self, document: &str) -> Result<(), StorageError>;

    /// Remove the stored document.
    fn clear(&self) -> Result<(), StorageError>;

    /// Move the stored document to a backup slot, replacing any earlier
    /// backup. Used for documents that exist but cannot be loaded.
    fn set_aside(&self) -> Result<(), StorageError>;
}

/// Stores the document in one file, by default `<dir>/focusflow_data.json`.
///
/// Saves are atomic: the document is written next to the target and
/// renamed over it.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Backend in the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self::in_dir(&data_dir()?))
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::at(dir.join(format!("{STATE_KEY}.json")))
    }

    /// Backend over an arbitrary file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where [`StateBackend::set_aside`] moves the document.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }
}

impl StateBackend for FileBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, document: &str) -> Result<(), StorageError> {
        // Write-then-rename so a failed write never truncates the old document.
        let mut tmp = self.path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let write_failed = |source| StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        std::fs::write(&tmp, document).map_err(write_failed)?;
        std::fs::rename(&tmp, &self.path).map_err(write_failed)
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::WriteFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn set_aside(&self) -> Result<(), StorageError> {
        let backup = self.backup_path();
        match std::fs::rename(&self.path, &backup) {
            Ok(()) => {
                tracing::warn!(backup = %backup.display(), "moved unreadable state document aside");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::WriteFailed { path: backup, source }),
        }
    }
}

/// Keeps the document in memory. Used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: RefCell<Option<String>>,
    backup: RefCell<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: RefCell::new(Some(document.into())),
            backup: RefCell::new(None),
        }
    }

    /// Snapshot of the stored document.
    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }

    /// Snapshot of the set-aside document.
    pub fn backup(&self) -> Option<String> {
        self.backup.borrow().clone()
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.document.borrow().clone())
    }

    fn save(&self, document: &str) -> Result<(), StorageError> {
        *self.document.borrow_mut() = Some(document.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.document.borrow_mut().take();
        Ok(())
    }

    fn set_aside(&self) -> Result<(), StorageError> {
        if let Some(document) = self.document.borrow_mut().take() {
            *self.backup.borrow_mut() = Some(document);
        }
        Ok(())
    }
}

impl<B: StateBackend + ?Sized> StateBackend for &B {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, document: &str) -> Result<(), StorageError> {
        (**self).save(document)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }

    fn set_aside(&self) -> Result<(), StorageError> {
        (**self).set_aside()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_backend_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::in_dir(dir.path());
        assert_eq!(backend.load().unwrap(), None);

        backend.save("{\"hasOnboarded\":true}").unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some("{\"hasOnboarded\":true}"));
        assert!(backend.path().ends_with("focusflow_data.json"));

        backend.clear().unwrap();
        assert_eq!(backend.load().unwrap(), None);
        backend.clear().unwrap();
    }

    #[test]
    fn file_backend_reports_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::in_dir(&dir.path().join("missing").join("nested"));
        let err = backend.save("{}").unwrap_err();
        assert!(matches!(err, StorageError::WriteFailed { .. }));
    }

    #[test]
    fn file_backend_sets_unreadable_document_aside() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::in_dir(dir.path());
        backend.save("{\"schemaVersion\":9}").unwrap();

        backend.set_aside().unwrap();
        assert_eq!(backend.load().unwrap(), None);
        assert!(backend.backup_path().ends_with("focusflow_data.json.bak"));
        assert_eq!(
            std::fs::read_to_string(backend.backup_path()).unwrap(),
            "{\"schemaVersion\":9}"
        );
        // Nothing stored: nothing to move.
        backend.set_aside().unwrap();
    }

    #[test]
    fn file_backend_at_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::at(dir.path().join("focus_session.json"));
        backend.save("{}").unwrap();
        assert!(dir.path().join("focus_session.json").exists());
        assert!(!dir.path().join("focus_session.json.tmp").exists());
    }

    #[test]
    fn memory_backend_holds_one_document() {
        let backend = MemoryBackend::new();
        backend.save("a").unwrap();
        backend.save("b").unwrap();
        assert_eq!(backend.document().as_deref(), Some("b"));
        backend.clear().unwrap();
        assert_eq!(backend.load().unwrap(), None);
    }

    #[test]
    fn memory_backend_set_aside_keeps_backup() {
        let backend = MemoryBackend::with_document("old");
        backend.set_aside().unwrap();
        assert_eq!(backend.document(), None);
        assert_eq!(backend.backup().as_deref(), Some("old"));
    }
}
