//! Per-route access policies
//!
//! Each route declares whether it is public and which roles may call it.
//! Routes missing from the table are protected: they need a valid token
//! but no particular role.

use axum::http::Method;
use std::collections::{BTreeSet, HashMap};

/// Access requirements of a single route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Skip both guards
    pub public: bool,
    /// Any one of these roles grants access; empty means any identity
    pub required_roles: BTreeSet<String>,
}

impl RoutePolicy {
    /// Reachable without a token
    pub fn public() -> Self {
        Self {
            public: true,
            required_roles: BTreeSet::new(),
        }
    }

    /// Any authenticated identity
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Authenticated identity holding at least one of `roles`
    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            public: false,
            required_roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lookup table from `(method, route pattern)` to policy
///
/// Patterns are the ones routes are registered with (e.g. `/blogs/:id`),
/// matched against axum's `MatchedPath`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<(Method, String), RoutePolicy>,
    fallback: RoutePolicy,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the policy of one route
    pub fn with(mut self, method: Method, path: &str, policy: RoutePolicy) -> Self {
        self.routes.insert((method, path.to_string()), policy);
        self
    }

    /// Policy for a matched route
    ///
    /// `HEAD` falls back to the `GET` declaration since axum serves `HEAD`
    /// through `GET` handlers.
    pub fn policy_for(&self, method: &Method, matched_path: Option<&str>) -> &RoutePolicy {
        let Some(path) = matched_path else {
            return &self.fallback;
        };

        let lookup = |method: &Method| self.routes.get(&(method.clone(), path.to_string()));

        lookup(method)
            .or_else(|| {
                if *method == Method::HEAD {
                    lookup(&Method::GET)
                } else {
                    None
                }
            })
            .unwrap_or(&self.fallback)
    }
}
