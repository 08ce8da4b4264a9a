use serde_json::json;

use super::{ApiClient, ApiError, ApiResponse};
use crate::models::{Credentials, RegistrationForm};

pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("users").await
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<ApiResponse, ApiError> {
        let payload = json!({
            "first_name": form.first_name,
            "email": form.email,
            "password": form.password,
        });
        self.client.post("users/register", payload).await
    }

    /// The response body carries the user record to persist.
    pub async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, ApiError> {
        let payload = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        self.client.post("users/login", payload).await
    }

    pub async fn logout(&self) -> Result<ApiResponse, ApiError> {
        self.client.post_empty("logout").await
    }
}
