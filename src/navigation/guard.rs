use std::sync::Arc;

use tracing::{debug, info};

use super::routes::{
    ResolvedRoute, RouteMeta, ADMIN_DASHBOARD_ROUTE, AUTHOR_DASHBOARD_ROUTE, CATALOG_ROUTE,
    LOGIN_ROUTE,
};
use crate::models::role::{ADMIN_ROLE, WRITER_ROLE};
use crate::models::SessionRecord;
use crate::session::{read_persisted_record, resolve_role};
use crate::storage::SessionStorage;
use crate::utils::value::sanitize_for_log;

/// Query key carrying the originally requested location to the login page.
pub const REDIRECT_QUERY_KEY: &str = "redirect";

/// Where a navigation should go instead of its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub route: String,
    pub query: Vec<(String, String)>,
}

impl Redirect {
    fn to(route: &str) -> Self {
        Self {
            route: route.to_string(),
            query: Vec::new(),
        }
    }

    fn to_login(requested: &str) -> Self {
        Self {
            route: LOGIN_ROUTE.to_string(),
            query: vec![(REDIRECT_QUERY_KEY.to_string(), requested.to_string())],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(Redirect),
}

/// Gates route transitions using the persisted session.
///
/// Reads storage on every check and never consults a `SessionStore`, so it
/// works before any store exists and always sees the latest write.
#[derive(Clone)]
pub struct NavigationGuard {
    storage: Arc<dyn SessionStorage>,
}

impl NavigationGuard {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn check(&self, to: &ResolvedRoute) -> NavigationDecision {
        let record = read_persisted_record(self.storage.as_ref());
        let decision = decide(record.as_ref(), &to.meta, &to.full_path);
        let requested = sanitize_for_log(&to.full_path);
        match &decision {
            NavigationDecision::Allow => debug!("Navigation to '{}' allowed", requested),
            NavigationDecision::Redirect(redirect) => info!(
                "Navigation to '{}' redirected to route '{}'",
                requested, redirect.route
            ),
        }
        decision
    }
}

/// The authorization rules, as a pure function of the session snapshot and
/// the target's requirements. `requested` is the full path of the target.
pub fn decide(record: Option<&SessionRecord>, to: &RouteMeta, requested: &str) -> NavigationDecision {
    if to.requires_auth && record.is_none() {
        return NavigationDecision::Redirect(Redirect::to_login(requested));
    }

    let role = record.and_then(resolve_role);
    let role = role.as_deref();

    if to.requires_writer && role != Some(WRITER_ROLE) && role != Some(ADMIN_ROLE) {
        // Admins satisfy the writer check, so the admin arm never fires.
        let target = if role == Some(ADMIN_ROLE) {
            ADMIN_DASHBOARD_ROUTE
        } else {
            CATALOG_ROUTE
        };
        return NavigationDecision::Redirect(Redirect::to(target));
    }

    if to.requires_admin && role != Some(ADMIN_ROLE) {
        let target = if role == Some(WRITER_ROLE) {
            AUTHOR_DASHBOARD_ROUTE
        } else {
            CATALOG_ROUTE
        };
        return NavigationDecision::Redirect(Redirect::to(target));
    }

    NavigationDecision::Allow
}
