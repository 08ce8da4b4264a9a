use std::collections::HashSet;
use std::fmt::Display;

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{ApiClient, ApiError, ApiResponse};

pub const PENDING_STATUS: &str = "pending";
pub const APPROVED_STATUS: &str = "approved";
pub const DENIED_STATUS: &str = "denied";

const AUTHOR_REQUEST_FALLBACKS: [&str; 2] = ["admin/author-requests", "authors/requests"];

/// Administrative endpoints. Several of them probe alternative routes since
/// deployed backends disagree on where author moderation lives.
pub struct AdminService<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn users(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("users/").await
    }

    pub async fn update_user_role(
        &self,
        user_id: impl Display,
        role: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .put(&format!("users/{}/role", user_id), json!({ "role": role }))
            .await
    }

    /// Pending author profiles.
    pub async fn author_requests(&self) -> Result<ApiResponse, ApiError> {
        match self.authors_with_status(PENDING_STATUS).await {
            Ok(response) => {
                let pending = match &response.data {
                    Value::Array(authors) => authors
                        .iter()
                        .filter(|a| a.get("status").and_then(Value::as_str) == Some(PENDING_STATUS))
                        .cloned()
                        .collect(),
                    _ => Vec::new(),
                };
                Ok(ApiResponse {
                    status: response.status,
                    data: Value::Array(pending),
                })
            }
            Err(e) if e.is_not_found() => {
                for path in AUTHOR_REQUEST_FALLBACKS {
                    debug!("Trying author request fallback {}", path);
                    match self.client.get(path).await {
                        Ok(response) => return Ok(response),
                        Err(e) => debug!("Fallback {} failed: {}", path, e),
                    }
                }
                Err(ApiError::RouteNotFound(format!(
                    "no author request route found; GET {}authors/ must support a 'status' \
                     query parameter, or GET {}admin/author-requests must exist",
                    self.client.base_url(),
                    self.client.base_url()
                )))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn approve_author_request(
        &self,
        author_id: impl Display,
    ) -> Result<ApiResponse, ApiError> {
        self.set_author_status(author_id, APPROVED_STATUS).await
    }

    pub async fn deny_author_request(
        &self,
        author_id: impl Display,
    ) -> Result<ApiResponse, ApiError> {
        self.set_author_status(author_id, DENIED_STATUS).await
    }

    /// Every author regardless of status.
    ///
    /// Backends that ignore `status=all` only list approved authors from
    /// `authors/`, so the pending and denied listings are merged in and
    /// de-duplicated by id. When those extra listings fail the plain listing
    /// is returned as is.
    pub async fn all_authors(&self) -> Result<ApiResponse, ApiError> {
        let first_error = match self.authors_with_status("all").await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };
        warn!("Listing all authors failed ({}), merging per-status listings", first_error);

        let listed = match self.client.get("authors/").await {
            Ok(response) => response,
            Err(_) => return Err(first_error),
        };
        let pending = self.authors_with_status(PENDING_STATUS).await;
        let denied = self.authors_with_status(DENIED_STATUS).await;
        let (pending, denied) = match (pending, denied) {
            (Ok(pending), Ok(denied)) => (pending, denied),
            _ => return Ok(listed),
        };

        let merged = merge_authors([&listed, &pending, &denied]);
        Ok(ApiResponse {
            status: listed.status,
            data: Value::Array(merged),
        })
    }

    pub async fn create_author_for_user(&self, author: Value) -> Result<ApiResponse, ApiError> {
        self.client.post("authors/", author).await
    }

    pub async fn all_books(&self) -> Result<ApiResponse, ApiError> {
        match self.client.get("admin/books").await {
            Err(e) if e.is_not_found() => {
                debug!("admin/books not available, using the public listing");
                self.client.get("books").await
            }
            result => result,
        }
    }

    async fn authors_with_status(&self, status: &str) -> Result<ApiResponse, ApiError> {
        self.client
            .get_with_query("authors/", &[("status", status.to_string())])
            .await
    }

    async fn set_author_status(
        &self,
        author_id: impl Display,
        status: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .put(
                &format!("authors/{}/status", author_id),
                json!({ "status": status }),
            )
            .await
    }
}

/// Concatenates author listings keeping the first entry seen for each id.
fn merge_authors<const N: usize>(responses: [&ApiResponse; N]) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for author in responses.iter().flat_map(|r| r.items()) {
        let id = author.get("id").cloned().unwrap_or(Value::Null);
        if seen.insert(id.to_string()) {
            merged.push(author);
        }
    }
    merged
}
