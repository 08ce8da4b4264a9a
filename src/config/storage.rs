use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The session storage backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum StorageConfig {
    #[serde(rename = "file")]
    File(FileStorageConfig),
    /// Nothing survives the process; useful for scripted runs and tests.
    #[serde(rename = "memory")]
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File(FileStorageConfig::default())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct FileStorageConfig {
    /// Defaults to `<data dir>/booklist/storage.json`.
    pub path: Option<PathBuf>,
}

impl FileStorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("booklist")
                .join("storage.json"),
        }
    }
}
