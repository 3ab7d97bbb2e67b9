//! User provisioning
//!
//! Accounts are created out of band (there is no registration endpoint).
//! The service is used at start-up to seed the configured admin account.

use crate::auth::PasswordService;
use crate::config::AdminConfig;
use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use portfolio_shared::validation::{normalize_role, validate_password, ValidationError};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tracing::info;
use validator::ValidateEmail;

/// Role granted to the seeded owner account
pub const ADMIN_ROLE: &str = "admin";

/// User service for account provisioning
pub struct UserService;

impl UserService {
    /// Check and normalize provisioning input
    ///
    /// Returns the deduplicated, lowercased role list.
    pub fn prepare(email: &str, password: &SecretString, roles: &[String]) -> Result<Vec<String>, ApiError> {
        if !email.validate_email() {
            return Err(ValidationError::new("email", "Invalid email format").into());
        }

        validate_password(password.expose_secret())
            .map_err(|msg| ValidationError::new("password", &msg))?;

        let mut normalized: Vec<String> = roles.iter().filter_map(|r| normalize_role(r)).collect();
        normalized.sort();
        normalized.dedup();
        Ok(normalized)
    }

    /// Create a user with the given roles
    ///
    /// # Performance
    /// Password hashing is offloaded to blocking thread pool via `spawn_blocking`.
    pub async fn provision(
        pool: &PgPool,
        email: &str,
        password: SecretString,
        roles: &[String],
    ) -> Result<UserRecord, ApiError> {
        let roles = Self::prepare(email, &password, roles)?;

        if UserRepository::email_exists(pool, email).await? {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(password).await?;
        let user = UserRepository::create(pool, email, &password_hash, &roles).await?;

        info!(user_id = %user.id, roles = ?user.roles, "User provisioned");
        Ok(user)
    }

    /// Seed the configured admin account if it does not exist yet
    ///
    /// Returns `true` when a user was created. An existing account is left
    /// untouched, including its password and roles.
    pub async fn ensure_admin(pool: &PgPool, admin: &AdminConfig) -> Result<bool, ApiError> {
        let (Some(email), Some(password)) = (&admin.email, &admin.password) else {
            return Ok(false);
        };

        if UserRepository::email_exists(pool, email).await? {
            return Ok(false);
        }

        Self::provision(
            pool,
            email,
            SecretString::new(password.clone()),
            &[ADMIN_ROLE.to_string()],
        )
        .await?;
        Ok(true)
    }
}
