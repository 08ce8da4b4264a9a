use tracing::warn;

use super::guard::{NavigationDecision, NavigationGuard};
use super::routes::{ResolvedRoute, RouteTable};

/// A guard redirect can itself be redirected; past this many hops the table is cyclic.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches '{0}'")]
    NoRoute(String),
    #[error("redirect target route '{0}' does not exist")]
    UnknownRedirectTarget(String),
    #[error("navigation to '{path}' exceeded {hops} redirects")]
    TooManyRedirects { path: String, hops: usize },
}

/// The outcome of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The route finally shown.
    pub route: ResolvedRoute,
    /// Every location the guard turned away, in order.
    pub redirected_from: Vec<String>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        !self.redirected_from.is_empty()
    }
}

/// Resolves locations against a route table and runs the guard on each hop.
#[derive(Clone)]
pub struct Router {
    routes: RouteTable,
    guard: NavigationGuard,
}

impl Router {
    pub fn new(routes: RouteTable, guard: NavigationGuard) -> Self {
        Self { routes, guard }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn navigate(&self, location: &str) -> Result<Navigation, NavigationError> {
        let mut target = self
            .routes
            .resolve(location)
            .ok_or_else(|| NavigationError::NoRoute(location.to_string()))?;
        let mut redirected_from = Vec::new();

        loop {
            match self.guard.check(&target) {
                NavigationDecision::Allow => {
                    return Ok(Navigation {
                        route: target,
                        redirected_from,
                    })
                }
                NavigationDecision::Redirect(redirect) => {
                    if redirected_from.len() >= MAX_REDIRECTS {
                        warn!("Redirect loop while navigating to '{}'", location);
                        return Err(NavigationError::TooManyRedirects {
                            path: location.to_string(),
                            hops: MAX_REDIRECTS,
                        });
                    }
                    let next = self
                        .routes
                        .resolve_named(&redirect.route, &redirect.query)
                        .ok_or_else(|| NavigationError::UnknownRedirectTarget(redirect.route))?;
                    redirected_from.push(std::mem::replace(&mut target, next).full_path);
                }
            }
        }
    }
}
