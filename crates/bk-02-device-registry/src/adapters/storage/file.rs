use crate::domain::StorageError;
use crate::ports::StorageBackend;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Directory-rooted store: one file per store name.
///
/// Writes go to a `<name>.tmp` sibling first and are renamed over the
/// store, so a crash mid-write leaves the previous content intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a backend rooted at `root`. The directory is created lazily.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the store files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of store `name`.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn ensure_root(&self, name: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|e| StorageError::io(name, e))
    }
}

impl StorageBackend for FileStorage {
    fn open_or_create(&self, name: &str) -> Result<(), StorageError> {
        self.ensure_root(name)?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_of(name))
            .map_err(|e| StorageError::io(name, e))?;
        Ok(())
    }

    fn read_all(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_of(name);
        match fs::read(&path) {
            Ok(bytes) => {
                trace!(path = %path.display(), bytes = bytes.len(), "Store read");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
                name: name.to_string(),
            }),
            Err(e) => Err(StorageError::io(name, e)),
        }
    }

    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.ensure_root(name)?;
        let path = self.path_of(name);
        let temp_path = self.root.join(format!("{name}.tmp"));

        let mut file = fs::File::create(&temp_path).map_err(|e| StorageError::io(name, e))?;
        file.write_all(bytes).map_err(|e| StorageError::io(name, e))?;
        file.sync_all().map_err(|e| StorageError::io(name, e))?;
        fs::rename(&temp_path, &path).map_err(|e| StorageError::io(name, e))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Store written");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_of(name)) {
            Ok(()) => {
                debug!(store = name, "Store removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(name, e)),
        }
    }
}
