// Route guard composer
// Decision: Every path under a group's prefix belongs to that group, matched or not
// Decision: Prefixes may not nest, so a path can never fall under two guards

use axum::{http::StatusCode, middleware, Router};

use crate::access_log::log_access;
use crate::auth::middleware::{enforce, AuthState, GateState, Guard};

/// A set of routes sharing a path prefix and a guard
pub struct RouteGroup {
    prefix: String,
    guard: Guard,
    routes: Router,
}

impl RouteGroup {
    pub fn new(prefix: impl Into<String>, guard: Guard, routes: Router) -> Self {
        Self {
            prefix: prefix.into(),
            guard,
            routes,
        }
    }
}

/// Problems found while building the route table
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route group prefix must be a non-root absolute path: {0:?}")]
    InvalidPrefix(String),

    #[error("route group prefixes overlap: {0} and {1}")]
    Overlap(String, String),
}

/// Route groups and the guard installed in front of each
pub struct RouteTable {
    auth: AuthState,
    groups: Vec<RouteGroup>,
}

impl RouteTable {
    pub fn new(auth: AuthState) -> Self {
        Self {
            auth,
            groups: Vec::new(),
        }
    }

    /// Add a group, rejecting prefixes that collide with an existing one
    pub fn group(mut self, mut group: RouteGroup) -> Result<Self, RouteTableError> {
        let prefix = normalize_prefix(&group.prefix)?;

        if let Some(existing) = self
            .groups
            .iter()
            .find(|g| prefixes_overlap(&g.prefix, &prefix))
        {
            return Err(RouteTableError::Overlap(existing.prefix.clone(), prefix));
        }

        group.prefix = prefix;
        self.groups.push(group);
        Ok(self)
    }

    /// Guard configured for each prefix, in insertion order
    pub fn guards(&self) -> impl Iterator<Item = (&str, Guard)> {
        self.groups.iter().map(|g| (g.prefix.as_str(), g.guard))
    }

    /// Nest every group under its prefix behind its gate and access log
    pub fn into_router(self) -> Router {
        let mut router = Router::new();

        for group in self.groups {
            tracing::debug!(prefix = %group.prefix, guard = ?group.guard, "Installing route group");

            let gate = GateState {
                auth: self.auth.clone(),
                guard: group.guard,
            };

            // Last layer added runs first: access log wraps the gate.
            // The group fallback keeps unknown paths under the prefix behind the gate.
            let routes = group
                .routes
                .fallback(group_not_found)
                .layer(middleware::from_fn_with_state(gate, enforce))
                .layer(middleware::from_fn(log_access));

            router = router.nest(&group.prefix, routes);
        }

        router
    }
}

async fn group_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn normalize_prefix(prefix: &str) -> Result<String, RouteTableError> {
    let trimmed = prefix.trim_end_matches('/');
    if !trimmed.starts_with('/') || trimmed.len() < 2 {
        return Err(RouteTableError::InvalidPrefix(prefix.to_string()));
    }
    Ok(trimmed.to_string())
}

fn prefixes_overlap(a: &str, b: &str) -> bool {
    let nested = |outer: &str, inner: &str| {
        inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    };
    nested(a, b) || nested(b, a)
}
