use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::session::read_persisted_record;
use crate::storage::{SessionStorage, SESSION_KEY};
use crate::utils::value::is_truthy;

/// The response code servers use to say the bearer token is no longer valid.
pub const EXPIRED_SESSION_CODE: &str = "expired-session";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}")]
    Status {
        url: String,
        status: StatusCode,
        body: Value,
    },
    #[error("{0}")]
    RouteNotFound(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// A successful (2xx) response with its body decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub data: Value,
}

impl ApiResponse {
    /// The body as a list: the array itself, or an `authors` array inside an object.
    pub fn items(&self) -> Vec<Value> {
        match &self.data {
            Value::Array(items) => items.clone(),
            Value::Object(object) => object
                .get("authors")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// HTTP client for the catalog API.
///
/// Attaches the persisted bearer token to every request and drops the
/// persisted session when a response reports it expired.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn SessionStorage>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, storage: Arc<dyn SessionStorage>) -> Result<Self, ApiError> {
        // Endpoints are relative, so the base must end in a slash to keep its last segment.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()
            .map_err(|e| ApiError::Transport {
                url: base.clone(),
                source: e,
            })?;

        debug!("API client targeting {}", base_url);
        Ok(Self {
            http,
            base_url,
            storage,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, path, &[], None).await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    /// POST without a body.
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, path, &[], None).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, path, &[], None).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let relative = path.trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{}", self.base_url, relative),
                reason: e.to_string(),
            })
    }

    /// The persisted token, if the stored session has a usable one.
    fn bearer_token(&self) -> Option<String> {
        let record = read_persisted_record(self.storage.as_ref())?;
        record.bearer_token().map(str::to_string)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(path)?;
        let mut request = self.http.request(method.clone(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        let authorized = match self.bearer_token() {
            Some(token) => {
                request = request.bearer_auth(token);
                true
            }
            None => false,
        };
        if let Some(body) = &body {
            request = request.json(body);
        }

        debug!(
            method = %method,
            url = %url,
            authorized,
            has_body = body.is_some(),
            "API request"
        );

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(method = %method, url = %url, "API request failed: {}", e);
                if e.is_timeout() || e.is_connect() {
                    error!("Network error - backend may not be running or is unreachable");
                }
                return Err(ApiError::Transport {
                    url: url.to_string(),
                    source: e,
                });
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: e,
        })?;
        let data = decode_body(&text);

        if is_expired_session(&data) {
            warn!("Server reported an expired session; clearing stored session");
            if let Err(e) = self.storage.remove_item(SESSION_KEY) {
                error!("Failed to clear expired session: {}", e);
            }
        }

        if !status.is_success() {
            error!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                body = %data,
                "API response error"
            );
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
                body: data,
            });
        }

        debug!(status = status.as_u16(), url = %url, body = %data, "API response");
        Ok(ApiResponse { status, data })
    }
}

/// Empty bodies become `{}`; bodies that are not JSON are passed through as a string.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return json!({});
    }
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse response as JSON: {}", e);
            Value::String(text.to_string())
        }
    }
}

/// `{ success: <falsy>, code: "expired-session" }`
pub fn is_expired_session(data: &Value) -> bool {
    let Some(object) = data.as_object() else {
        return false;
    };
    let succeeded = object.get("success").is_some_and(is_truthy);
    !succeeded && object.get("code").and_then(Value::as_str) == Some(EXPIRED_SESSION_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use mockito::{Matcher, Server};

    const SESSION: &str = r#"{"id":1,"email":"r@example.com","token":"tok-123"}"#;

    fn client_for(server: &Server, storage: Arc<dyn SessionStorage>) -> ApiClient {
        let config = ApiConfig {
            base_url: format!("{}/booklistapi", server.url()),
            timeout_in_ms: 2_000,
        };
        ApiClient::new(&config, storage).expect("client should build")
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), json!({}));
        assert_eq!(decode_body("  \n"), json!({}));
        assert_eq!(decode_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(
            decode_body("<html>404</html>"),
            json!("<html>404</html>")
        );
    }

    #[test]
    fn test_is_expired_session() {
        assert!(is_expired_session(&json!({"success": false, "code": "expired-session"})));
        assert!(is_expired_session(&json!({"code": "expired-session"})));
        assert!(!is_expired_session(&json!({"success": true, "code": "expired-session"})));
        assert!(!is_expired_session(&json!({"success": false, "code": "forbidden"})));
        assert!(!is_expired_session(&json!("expired-session")));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_in_ms: 100,
        };
        let result = ApiClient::new(&config, Arc::new(MemoryStorage::new()));
        assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_bearer_header_and_default_headers() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/booklistapi/favorites")
            .match_header("authorization", "Bearer tok-123")
            .match_header("accept", "application/json")
            .match_header("x-requested-with", "XMLHttpRequest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"book_id": 4}]"#)
            .create_async()
            .await;

        let storage = Arc::new(MemoryStorage::with_item(SESSION_KEY, SESSION));
        let client = client_for(&server, storage);
        let response = client.get("favorites").await.unwrap();
        m.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.data, json!([{"book_id": 4}]));
    }

    #[tokio::test]
    async fn test_no_bearer_without_session() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/booklistapi/books")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .expect(4)
            .create_async()
            .await;

        for raw in [
            None,
            Some("{broken"),
            Some(r#"{"id":1,"token":""}"#),
            Some(r#"{"id":1,"token":null}"#),
        ] {
            let storage: Arc<dyn SessionStorage> = match raw {
                Some(raw) => Arc::new(MemoryStorage::with_item(SESSION_KEY, raw)),
                None => Arc::new(MemoryStorage::new()),
            };
            client_for(&server, storage).get("/books").await.unwrap();
        }
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_session_clears_storage() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/booklistapi/lists/my")
            .with_status(401)
            .with_body(r#"{"success": false, "code": "expired-session"}"#)
            .create_async()
            .await;

        let storage: Arc<dyn SessionStorage> =
            Arc::new(MemoryStorage::with_item(SESSION_KEY, SESSION));
        let client = client_for(&server, storage.clone());
        let err = client.get("lists/my").await.unwrap_err();
        m.assert_async().await;

        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(storage.get_item(SESSION_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_on_success_status_also_clears() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/booklistapi/recommendations")
            .with_status(200)
            .with_body(r#"{"success": false, "code": "expired-session"}"#)
            .create_async()
            .await;

        let storage: Arc<dyn SessionStorage> =
            Arc::new(MemoryStorage::with_item(SESSION_KEY, SESSION));
        let response = client_for(&server, storage.clone())
            .get("recommendations")
            .await
            .unwrap();
        assert_eq!(response.data["code"], json!("expired-session"));
        assert_eq!(storage.get_item(SESSION_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_errors_keep_session() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("DELETE", "/booklistapi/books/5")
            .with_status(403)
            .with_body(r#"{"success": false, "code": "forbidden"}"#)
            .create_async()
            .await;

        let storage: Arc<dyn SessionStorage> =
            Arc::new(MemoryStorage::with_item(SESSION_KEY, SESSION));
        let err = client_for(&server, storage.clone())
            .delete("books/5")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(storage.get_item(SESSION_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_json_body_and_empty_response() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/booklistapi/favorites")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"book_id": 8})))
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server, Arc::new(MemoryStorage::new()));
        let response = client.post("favorites", json!({"book_id": 8})).await.unwrap();
        m.assert_async().await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert_eq!(response.data, json!({}));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1/booklistapi/".to_string(),
            timeout_in_ms: 500,
        };
        let client = ApiClient::new(&config, Arc::new(MemoryStorage::new())).unwrap();
        let err = client.get("books").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }
}
