use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3201/booklistapi/";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Where the catalog REST API lives and how long we wait for it.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are resolved relative to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_in_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_in_ms: default_timeout_in_ms(),
        }
    }
}
