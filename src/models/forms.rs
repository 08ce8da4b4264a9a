//! Request payloads sent by the resource services.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Login credentials. Only these two fields are ever sent.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form; accepts `firstName` or `first_name` when read from JSON.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegistrationForm {
    #[serde(alias = "firstName")]
    pub first_name: String,
    pub email: String,
    pub password: String,
}

/// Filters for the book listing.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BookQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub genre: Option<String>,
    pub isbn: Option<String>,
}

impl BookQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(genre) = &self.genre {
            pairs.push(("genre", genre.clone()));
        }
        if let Some(isbn) = &self.isbn {
            pairs.push(("isbn", isbn.clone()));
        }
        pairs
    }
}

/// A reader asking to become an author.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AuthorProfileRequest {
    pub name: Option<String>,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<Value>,
}

impl AuthorProfileRequest {
    /// The backend requires `name`; fall back to the first name, then "".
    /// Empty strings count as missing.
    pub fn to_payload(&self) -> Value {
        fn filled(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|s| !s.is_empty())
        }

        let name = filled(&self.name)
            .or_else(|| filled(&self.first_name))
            .unwrap_or_default();
        json!({
            "name": name,
            "bio": filled(&self.bio),
            "website": filled(&self.website),
            "social_links": self.social_links.clone().filter(|v| !v.is_null()),
        })
    }
}
