use std::fmt::Display;

use serde_json::Value;

use super::{ApiClient, ApiError, ApiResponse};
use crate::models::BookQuery;

/// Catalog book endpoints.
pub struct BookService<'a> {
    client: &'a ApiClient,
}

impl<'a> BookService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &BookQuery) -> Result<ApiResponse, ApiError> {
        self.client
            .get_with_query("books", &query.to_pairs())
            .await
    }

    pub async fn get(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("books/{}", id)).await
    }

    pub async fn similar(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("books/{}/similar", id)).await
    }

    /// Recommendations for the signed-in user.
    pub async fn recommendations(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("recommendations").await
    }

    pub async fn create(&self, book: Value) -> Result<ApiResponse, ApiError> {
        self.client.post("books", book).await
    }

    pub async fn update(&self, id: impl Display, book: Value) -> Result<ApiResponse, ApiError> {
        self.client.put(&format!("books/{}", id), book).await
    }

    pub async fn delete(&self, id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.delete(&format!("books/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client_for;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_sends_filters() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/booklistapi/books")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "left hand".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"books": [], "total": 0}"#)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let query = BookQuery {
            q: Some("left hand".into()),
            page: Some(2),
            ..Default::default()
        };
        let response = client.books().list(&query).await.unwrap();
        m.assert_async().await;
        assert_eq!(response.data["total"], json!(0));
    }

    #[tokio::test]
    async fn test_crud_paths() {
        let mut server = Server::new_async().await;
        let get = server
            .mock("GET", "/booklistapi/books/3")
            .with_body(r#"{"id": 3}"#)
            .create_async()
            .await;
        let similar = server
            .mock("GET", "/booklistapi/books/3/similar")
            .with_body("[]")
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/booklistapi/books/3")
            .match_body(Matcher::Json(json!({"title": "New"})))
            .with_body(r#"{"id": 3, "title": "New"}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/booklistapi/books/3")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let books = client.books();
        assert_eq!(books.get(3).await.unwrap().data, json!({"id": 3}));
        books.similar(3).await.unwrap();
        books.update(3, json!({"title": "New"})).await.unwrap();
        books.delete(3).await.unwrap();

        get.assert_async().await;
        similar.assert_async().await;
        update.assert_async().await;
        delete.assert_async().await;
    }
}
