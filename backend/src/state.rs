//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers and guards via Axum's state extraction.
//!
//! Everything in here is built once at start-up and is read-only while
//! requests are being served.

use crate::auth::{JwtService, RouteTable};
use crate::config::AppConfig;
use crate::repositories::{CredentialStore, PgCredentialStore};
use crate::routes;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// All fields are cheap to clone: `PgPool` is internally Arc'd and the rest
/// are wrapped in `Arc` or hold pre-computed keys behind one.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Where login looks users up
    pub users: Arc<dyn CredentialStore>,
    /// Per-route access policies consulted by the guards
    pub routes: Arc<RouteTable>,
}

impl AppState {
    /// Create a new application state backed by PostgreSQL
    ///
    /// # Note
    /// This pre-computes JWT keys from the config secret, so it should only
    /// be called once at application startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        );
        let users: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(db.clone()));

        Self {
            db,
            config: Arc::new(config),
            jwt,
            users,
            routes: Arc::new(routes::route_table()),
        }
    }

    /// Replace the credential store (used by tests and alternative backends)
    pub fn with_credential_store(mut self, users: Arc<dyn CredentialStore>) -> Self {
        self.users = users;
        self
    }

    /// Replace the route policy table
    pub fn with_route_table(mut self, routes: RouteTable) -> Self {
        self.routes = Arc::new(routes);
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Get a reference to the credential store
    #[inline]
    pub fn users(&self) -> &dyn CredentialStore {
        self.users.as_ref()
    }

    /// Get a reference to the route policy table
    #[inline]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}
