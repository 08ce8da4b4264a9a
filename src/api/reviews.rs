use std::fmt::Display;

use serde_json::Value;

use super::{ApiClient, ApiError, ApiResponse};

pub struct ReviewService<'a> {
    client: &'a ApiClient,
}

impl<'a> ReviewService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn for_book(&self, book_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("reviews/book/{}", book_id)).await
    }

    pub async fn get(&self, review_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.get(&format!("reviews/{}", review_id)).await
    }

    /// The signed-in user's review of a book.
    pub async fn mine(&self, book_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client
            .get(&format!("reviews/book/{}/my", book_id))
            .await
    }

    pub async fn create(&self, review: Value) -> Result<ApiResponse, ApiError> {
        self.client.post("reviews", review).await
    }

    pub async fn update(
        &self,
        review_id: impl Display,
        review: Value,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .put(&format!("reviews/{}", review_id), review)
            .await
    }

    pub async fn delete(&self, review_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client.delete(&format!("reviews/{}", review_id)).await
    }

    pub async fn mark_helpful(&self, review_id: impl Display) -> Result<ApiResponse, ApiError> {
        self.client
            .post_empty(&format!("reviews/{}/helpful", review_id))
            .await
    }

    pub async fn mark_not_helpful(
        &self,
        review_id: impl Display,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .post_empty(&format!("reviews/{}/not-helpful", review_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{client_for, READER_SESSION};
    use mockito::Server;
    use serde_json::json;

    #[tokio::test]
    async fn test_votes_and_mine() {
        let mut server = Server::new_async().await;
        let helpful = server
            .mock("POST", "/booklistapi/reviews/5/helpful")
            .with_body(r#"{"helpful_count": 3}"#)
            .create_async()
            .await;
        let not_helpful = server
            .mock("POST", "/booklistapi/reviews/5/not-helpful")
            .with_body("{}")
            .create_async()
            .await;
        let mine = server
            .mock("GET", "/booklistapi/reviews/book/2/my")
            .with_body(r#"{"rating": 4}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some(READER_SESSION));
        let reviews = client.reviews();
        let response = reviews.mark_helpful(5).await.unwrap();
        assert_eq!(response.data["helpful_count"], json!(3));
        reviews.mark_not_helpful(5).await.unwrap();
        assert_eq!(reviews.mine(2).await.unwrap().data["rating"], json!(4));

        helpful.assert_async().await;
        not_helpful.assert_async().await;
        mine.assert_async().await;
    }
}
