//! The route table and path matching.

use std::collections::{BTreeMap, HashSet};

use reqwest::Url;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const HOME_ROUTE: &str = "home";
pub const LOGIN_ROUTE: &str = "login";
pub const CATALOG_ROUTE: &str = "books";
pub const AUTHOR_DASHBOARD_ROUTE: &str = "authorDashboard";
pub const ADMIN_DASHBOARD_ROUTE: &str = "adminDashboard";

/// Routes the guard may redirect to; every table must define them.
pub const REDIRECT_TARGETS: [&str; 4] = [
    LOGIN_ROUTE,
    CATALOG_ROUTE,
    AUTHOR_DASHBOARD_ROUTE,
    ADMIN_DASHBOARD_ROUTE,
];

/// Access requirements declared on a route.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
pub struct RouteMeta {
    #[serde(default, alias = "requiresAuth")]
    pub requires_auth: bool,
    #[serde(default, alias = "requiresWriter")]
    pub requires_writer: bool,
    #[serde(default, alias = "requiresAdmin")]
    pub requires_admin: bool,
}

impl RouteMeta {
    pub const PUBLIC: RouteMeta = RouteMeta {
        requires_auth: false,
        requires_writer: false,
        requires_admin: false,
    };
    pub const AUTH: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_writer: false,
        requires_admin: false,
    };
    pub const WRITER: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_writer: true,
        requires_admin: false,
    };
    pub const ADMIN: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_writer: false,
        requires_admin: true,
    };
}

/// A named route. `:param` segments in `path` match any single segment.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct RouteDefinition {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub meta: RouteMeta,
}

impl RouteDefinition {
    pub fn new(name: &str, path: &str, meta: RouteMeta) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            meta,
        }
    }

    /// Match a bare path (no query) against this route's pattern.
    fn match_path(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let pattern: Vec<&str> = segments(&self.path).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, got) in pattern.iter().zip(actual.iter()) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), (*got).to_string());
                }
                None if expected == got => {}
                None => return None,
            }
        }
        Some(params)
    }
}

/// A route matched for a concrete requested location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: String,
    /// The location as requested, query string included.
    pub full_path: String,
    pub params: BTreeMap<String, String>,
    pub meta: RouteMeta,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route table has no '{0}' route, which the navigation guard redirects to")]
    MissingRedirectTarget(String),
    #[error("route name '{0}' is defined more than once")]
    DuplicateName(String),
}

/// An ordered set of routes; the first matching route wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    /// Validate and build a table. Missing redirect targets are rejected here
    /// so a misconfigured table fails at startup rather than mid-navigation.
    pub fn new(routes: Vec<RouteDefinition>) -> Result<Self, RouteTableError> {
        let mut seen = HashSet::new();
        for route in &routes {
            if !seen.insert(route.name.as_str()) {
                return Err(RouteTableError::DuplicateName(route.name.clone()));
            }
        }
        if let Some(missing) = REDIRECT_TARGETS.iter().find(|t| !seen.contains(**t)) {
            return Err(RouteTableError::MissingRedirectTarget(missing.to_string()));
        }
        Ok(Self { routes })
    }

    /// The book catalog's routes.
    pub fn catalog() -> Self {
        Self {
            routes: vec![
                RouteDefinition::new(HOME_ROUTE, "/", RouteMeta::AUTH),
                RouteDefinition::new(LOGIN_ROUTE, "/login", RouteMeta::PUBLIC),
                RouteDefinition::new(CATALOG_ROUTE, "/books", RouteMeta::PUBLIC),
                RouteDefinition::new("bookDetail", "/books/:id", RouteMeta::PUBLIC),
                RouteDefinition::new("favorites", "/favorites", RouteMeta::AUTH),
                RouteDefinition::new("lists", "/lists", RouteMeta::AUTH),
                RouteDefinition::new("listDetail", "/lists/:id", RouteMeta::AUTH),
                RouteDefinition::new(AUTHOR_DASHBOARD_ROUTE, "/author", RouteMeta::WRITER),
                RouteDefinition::new(ADMIN_DASHBOARD_ROUTE, "/admin", RouteMeta::ADMIN),
            ],
        }
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteDefinition> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Find the route for a requested location. Query string and fragment
    /// are ignored for matching and kept in `full_path`.
    pub fn resolve(&self, full_path: &str) -> Option<ResolvedRoute> {
        let path = strip_query(full_path);
        self.routes.iter().find_map(|route| {
            route.match_path(path).map(|params| ResolvedRoute {
                name: route.name.clone(),
                full_path: full_path.to_string(),
                params,
                meta: route.meta,
            })
        })
    }

    /// Resolve a named route with a query, as a redirect produces it.
    pub fn resolve_named(&self, name: &str, query: &[(String, String)]) -> Option<ResolvedRoute> {
        let route = self.by_name(name)?;
        Some(ResolvedRoute {
            name: route.name.clone(),
            full_path: render_location(&route.path, query),
            params: BTreeMap::new(),
            meta: route.meta,
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::catalog()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn strip_query(full_path: &str) -> &str {
    let end = full_path
        .find(|c: char| c == '?' || c == '#')
        .unwrap_or(full_path.len());
    &full_path[..end]
}

/// `path?k=v&...` with form-urlencoded pairs.
pub fn render_location(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    // Borrow Url's query serializer; the host is irrelevant.
    match Url::parse("http://localhost/") {
        Ok(mut scratch) => {
            scratch
                .query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            format!("{}?{}", path, scratch.query().unwrap_or_default())
        }
        Err(_) => path.to_string(),
    }
}

/// Read one query parameter back out of a location.
pub fn query_param(location: &str, key: &str) -> Option<String> {
    let (_, query) = location.split_once('?')?;
    let url = Url::parse(&format!("http://localhost/?{}", query)).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_resolves_static_and_param_routes() {
        let table = RouteTable::catalog();

        let home = table.resolve("/").unwrap();
        assert_eq!(home.name, "home");
        assert!(home.meta.requires_auth);

        let detail = table.resolve("/books/42").unwrap();
        assert_eq!(detail.name, "bookDetail");
        assert_eq!(detail.params.get("id").map(String::as_str), Some("42"));

        let list = table.resolve("/lists/7/?sort=asc#top").unwrap();
        assert_eq!(list.name, "listDetail");
        assert_eq!(list.full_path, "/lists/7/?sort=asc#top");

        assert!(table.resolve("/books/42/edit").is_none());
        assert!(table.resolve("/nowhere").is_none());
    }

    #[test]
    fn test_catalog_flags() {
        let table = RouteTable::catalog();
        assert_eq!(table.by_name("authorDashboard").unwrap().meta, RouteMeta::WRITER);
        assert_eq!(table.by_name("adminDashboard").unwrap().meta, RouteMeta::ADMIN);
        assert_eq!(table.by_name("books").unwrap().meta, RouteMeta::PUBLIC);
        assert!(RouteTable::new(table.routes().to_vec()).is_ok());
    }

    #[test]
    fn test_missing_redirect_target_is_rejected() {
        let routes: Vec<RouteDefinition> = RouteTable::catalog()
            .routes()
            .iter()
            .filter(|r| r.name != "authorDashboard")
            .cloned()
            .collect();
        assert_eq!(
            RouteTable::new(routes).unwrap_err(),
            RouteTableError::MissingRedirectTarget("authorDashboard".to_string())
        );
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut routes = RouteTable::catalog().routes().to_vec();
        routes.push(RouteDefinition::new("books", "/library", RouteMeta::PUBLIC));
        assert_eq!(
            RouteTable::new(routes).unwrap_err(),
            RouteTableError::DuplicateName("books".to_string())
        );
    }

    #[test]
    fn test_render_and_read_location() {
        let location = render_location(
            "/login",
            &[("redirect".to_string(), "/lists/3?tab=a b".to_string())],
        );
        assert!(location.starts_with("/login?redirect="));
        assert_eq!(
            query_param(&location, "redirect").as_deref(),
            Some("/lists/3?tab=a b")
        );
        assert_eq!(render_location("/books", &[]), "/books");
        assert_eq!(query_param("/books", "redirect"), None);
    }

    #[test]
    fn test_meta_accepts_camel_case_keys() {
        let meta: RouteMeta =
            serde_json::from_str(r#"{"requiresAuth": true, "requiresAdmin": true}"#).unwrap();
        assert_eq!(meta, RouteMeta::ADMIN);
    }
}
