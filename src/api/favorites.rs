use std::fmt::Display;

use serde_json::{json, Value};

use super::{ApiClient, ApiError, ApiResponse};

pub struct FavoriteService<'a> {
    client: &'a ApiClient,
}

impl<'a> FavoriteService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("favorites").await
    }

    pub async fn add(&self, book_id: impl Into<Value>) -> Result<ApiResponse, ApiError> {
        self.client
            .post("favorites", json!({ "book_id": book_id.into() }))
            .await
    }

    pub async fn remove(&self, book_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.delete(&format!("favorites/{}", book_id)).await
    }

    pub async fn check(&self, book_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client
            .get(&format!("favorites/{}/check", book_id))
            .await
    }
}
