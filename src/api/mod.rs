//! HTTP access to the catalog backend.
//!
//! [`ApiClient`] owns the transport and the session-token plumbing; the
//! per-resource services borrow it and only know their endpoints.

pub mod admin;
pub mod authors;
pub mod books;
pub mod client;
pub mod favorites;
pub mod lists;
pub mod reviews;
pub mod users;

pub use admin::AdminService;
pub use authors::AuthorService;
pub use books::BookService;
pub use client::{decode_body, is_expired_session, ApiClient, ApiError, ApiResponse};
pub use favorites::FavoriteService;
pub use lists::ListService;
pub use reviews::ReviewService;
pub use users::UserService;

impl ApiClient {
    pub fn books(&self) -> BookService<'_> {
        BookService::new(self)
    }

    pub fn authors(&self) -> AuthorService<'_> {
        AuthorService::new(self)
    }

    pub fn reviews(&self) -> ReviewService<'_> {
        ReviewService::new(self)
    }

    pub fn lists(&self) -> ListService<'_> {
        ListService::new(self)
    }

    pub fn favorites(&self) -> FavoriteService<'_> {
        FavoriteService::new(self)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn admin(&self) -> AdminService<'_> {
        AdminService::new(self)
    }
}
