pub mod guard;
pub mod router;
pub mod routes;

pub use guard::{decide, NavigationDecision, NavigationGuard, Redirect, REDIRECT_QUERY_KEY};
pub use router::{Navigation, NavigationError, Router};
pub use routes::{ResolvedRoute, RouteDefinition, RouteMeta, RouteTable, RouteTableError};
