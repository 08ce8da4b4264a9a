use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::{file_storage::FileStorage, memory_storage::MemoryStorage};
use crate::config::StorageConfig;

/// The one key the session record lives under.
pub const SESSION_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize storage contents: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous string key/value storage with browser local-storage semantics:
/// one value per key, last write wins, removing a missing key is not an error.
pub trait SessionStorage: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Creates a concrete storage implementation based on the StorageConfig.
pub fn create_storage(config: &StorageConfig) -> Arc<dyn SessionStorage> {
    match config {
        StorageConfig::File(file_config) => {
            let path = file_config.resolved_path();
            info!("Using file session storage at {}", path.display());
            Arc::new(FileStorage::new(path))
        }
        StorageConfig::Memory => {
            info!("Using in-memory session storage; sessions will not persist.");
            Arc::new(MemoryStorage::new())
        }
    }
}
