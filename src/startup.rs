//! Application startup.
//!
//! Builds the storage backend, route table, navigation guard and API client
//! from the loaded configuration.

use std::sync::Arc;

use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::config::ConfigV1;
use crate::navigation::{NavigationGuard, RouteTable, RouteTableError, Router};
use crate::state::AppState;
use crate::storage::create_storage;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteTableError),
    #[error("could not create API client: {0}")]
    Api(#[from] ApiError),
}

/// Initializes the application state.
///
/// # Errors
///
/// Fails when configured routes lack a redirect target or repeat a name, or
/// when the API base URL is unusable.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, StartupError> {
    let storage = create_storage(&config.storage);

    let routes = match &config.routes {
        Some(routes) => {
            info!("Using {} configured routes", routes.len());
            RouteTable::new(routes.clone())?
        }
        None => RouteTable::catalog(),
    };

    let client = Arc::new(ApiClient::new(&config.api, storage.clone())?);
    info!("Catalog API at {}", client.base_url());

    let router = Router::new(routes, NavigationGuard::new(storage.clone()));

    Ok(AppState {
        config,
        storage,
        client,
        router,
    })
}
