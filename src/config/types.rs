use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::api::ApiConfig;
use super::logging::LoggingConfig;
use super::storage::StorageConfig;
use crate::navigation::RouteDefinition;

pub const CURRENT_CONFIG_VERSION: &str = "1.0.0";
pub const ENV_PREFIX: &str = "BOOKLIST_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0. Every section has defaults, so a missing file
/// still yields a usable client.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// Replaces the built-in catalog route table when present.
    #[serde(default)]
    pub routes: Option<Vec<RouteDefinition>>,
}

/// Layers the built-in version tag, the YAML file and `BOOKLIST_*` env vars
/// (nested keys separated by `__`, e.g. `BOOKLIST_API__BASE_URL`).
pub fn config_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::default("version", CURRENT_CONFIG_VERSION))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn extract_config(figment: &Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Load config from the given YAML file, exiting the process when it is invalid.
pub fn load_config(path: &Path) -> ConfigV1 {
    match extract_config(&config_figment(path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// The JSON schema for the configuration file.
pub fn schema_json() -> Result<String, serde_json::Error> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}
