use std::sync::Arc;

use booklist_client::config::{extract_config, ConfigV1, CURRENT_CONFIG_VERSION};
use booklist_client::startup::build_state;
use booklist_client::state::AppState;
use figment::providers::{Format, Serialized, Yaml};
use figment::Figment;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A signed HS256 token whose payload carries `role`. The signature is never
/// checked client-side.
pub fn token_with_role(role: Option<&str>) -> String {
    let claims = Claims {
        sub: "42".to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        role: role.map(str::to_string),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"integration-secret"),
    )
    .expect("failed to encode token")
}

pub fn config_from_yaml(yaml: &str) -> ConfigV1 {
    let figment = Figment::new()
        .merge(Serialized::default("version", CURRENT_CONFIG_VERSION))
        .merge(Yaml::string(yaml));
    extract_config(&figment).expect("test config should parse")
}

/// State backed by in-memory storage and pointed at `base_url`.
pub fn memory_state(base_url: &str) -> AppState {
    let yaml = format!(
        r#"
logging:
  level: debug
storage:
  type: memory
api:
  base_url: {}
  timeout_in_ms: 2000
"#,
        base_url
    );
    build_state(Arc::new(config_from_yaml(&yaml))).expect("state should build")
}
