//! Shared application state.
//!
//! Holds everything a command needs: configuration, the session storage
//! backend, the API client and the guarded router.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::ConfigV1;
use crate::navigation::Router;
use crate::session::SessionStore;
use crate::storage::SessionStorage;

/// Application state shared by the CLI commands.
///
/// The storage backend is shared by the API client, the navigation guard and
/// any session store created from it, so they all see the same session.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Backend holding the persisted session record.
    pub storage: Arc<dyn SessionStorage>,
    pub client: Arc<ApiClient>,
    pub router: Router,
}

impl AppState {
    /// A session store hydrated from the shared storage.
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(self.storage.clone())
    }
}
