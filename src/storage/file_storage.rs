use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use super::{SessionStorage, StorageError};

type Items = BTreeMap<String, String>;

/// Stores all keys in a single JSON object file. Writes go to a sibling
/// temp file and are renamed into place, so readers never see half a file.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_items(&self) -> Result<Items, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Items::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if contents.trim().is_empty() {
            return Ok(Items::new());
        }
        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Read for modification; a corrupt file is replaced rather than blocking writes.
    fn read_items_for_update(&self) -> Result<Items, StorageError> {
        match self.read_items() {
            Err(StorageError::Corrupt { path, source }) => {
                warn!(
                    "Discarding corrupt storage file {}: {}",
                    path.display(),
                    source
                );
                Ok(Items::new())
            }
            other => other,
        }
    }

    fn write_items(&self, items: &Items) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let serialized = serde_json::to_string_pretty(items)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serialized).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;
        debug!("Wrote {} key(s) to {}", items.len(), self.path.display());
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get_name(&self) -> &str {
        "file"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_items_for_update()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = match self.read_items() {
            Ok(items) => items,
            Err(StorageError::Corrupt { path, source }) => {
                warn!("Resetting corrupt storage file {}: {}", path.display(), source);
                return self.write_items(&Items::new());
            }
            Err(e) => return Err(e),
        };
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_items(&items)
    }
}
