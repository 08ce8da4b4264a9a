use std::fmt::Display;

use serde_json::Value;

use super::{ApiClient, ApiError, ApiResponse};
use crate::models::AuthorProfileRequest;

/// Author profile endpoints.
pub struct AuthorService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthorService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The signed-in user's own author profile.
    pub async fn my_profile(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("authors/me").await
    }

    /// Ask to become an author; the profile starts out pending.
    pub async fn request_profile(
        &self,
        request: &AuthorProfileRequest,
    ) -> Result<ApiResponse, ApiError> {
        self.client.post("authors/", request.to_payload()).await
    }

    pub async fn get(&self, author_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("authors/{}", author_id)).await
    }

    pub async fn update_profile(
        &self,
        author_id: impl Display,
        profile: Value,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .put(&format!("authors/{}", author_id), profile)
            .await
    }

    pub async fn books(&self, author_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("authors/{}/books", author_id)).await
    }

    /// Reviews left on the author's books.
    pub async fn book_reviews(&self, author_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client
            .get(&format!("authors/{}/reviews", author_id))
            .await
    }
}
