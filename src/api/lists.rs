use std::fmt::Display;

use serde_json::{json, Value};

use super::{ApiClient, ApiError, ApiResponse};

/// Reading lists owned by the signed-in user.
pub struct ListService<'a> {
    client: &'a ApiClient,
}

impl<'a> ListService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn mine(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("lists/my").await
    }

    pub async fn get(&self, list_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("lists/{}", list_id)).await
    }

    pub async fn items(&self, list_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("lists/{}/items", list_id)).await
    }

    pub async fn create(&self, list: Value) -> Result<ApiResponse, ApiError> {
        self.client.post("lists", list).await
    }

    /// Rename, change visibility, etc.
    pub async fn update(&self, list_id: impl Display, list: Value) -> Result<ApiResponse, ApiError> {
        self.client.put(&format!("lists/{}", list_id), list).await
    }

    pub async fn delete(&self, list_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.delete(&format!("lists/{}", list_id)).await
    }

    pub async fn add_book(
        &self,
        list_id: impl Display,
        book_id: impl Into<Value>,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .post(
                &format!("lists/{}/items", list_id),
                json!({ "book_id": book_id.into() }),
            )
            .await
    }

    pub async fn remove_book(
        &self,
        list_id: impl Display,
        item_id: impl Display,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .delete(&format!("lists/{}/items/{}", list_id, item_id))
            .await
    }

    pub async fn reorder_item(
        &self,
        list_id: impl Display,
        item_id: impl Display,
        order_index: i64,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .put(
                &format!("lists/{}/items/{}", list_id, item_id),
                json!({ "order_index": order_index }),
            )
            .await
    }
}
