//! Authentication service: credential check and token issuance
//!
//! # Performance
//!
//! - Password verification runs on the blocking thread pool
//! - JWT service is passed by reference (pre-computed keys)

use crate::auth::{IdentityClaims, JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::CredentialStore;
use portfolio_shared::{AccessToken, AuthError, LoginRequest};
use secrecy::SecretString;
use tracing::{debug, info, warn};

/// Login attempt; lives only for the duration of the call
#[derive(Debug)]
pub struct Credential {
    pub email: String,
    pub password: SecretString,
}

impl From<LoginRequest> for Credential {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: SecretString::new(req.password),
        }
    }
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Check an email/password pair against the credential store
    ///
    /// Returns `None` both for an unknown email and for a wrong password so
    /// callers cannot tell the two apart.
    pub async fn validate_credential(
        store: &dyn CredentialStore,
        email: &str,
        password: SecretString,
    ) -> Result<Option<IdentityClaims>, ApiError> {
        let Some(user) = store.find_by_email(email).await? else {
            PasswordService::verify_dummy_async(password).await;
            debug!("Login rejected");
            return Ok(None);
        };

        let valid = match PasswordService::verify_async(password, user.password_hash.clone()).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                false
            }
        };

        if !valid {
            debug!("Login rejected");
            return Ok(None);
        }

        Ok(Some(IdentityClaims::new(user.id, user.email, user.roles)))
    }

    /// Issue an access token for a verified identity
    pub fn login(jwt_service: &JwtService, identity: &IdentityClaims) -> Result<AccessToken, ApiError> {
        let access_token = jwt_service.issue(identity)?;

        info!(user_id = %identity.user_id, "User logged in");

        Ok(AccessToken { access_token })
    }

    /// Validate the credential, then issue a token
    pub async fn authenticate_and_login(
        store: &dyn CredentialStore,
        jwt_service: &JwtService,
        credential: Credential,
    ) -> Result<AccessToken, ApiError> {
        let identity = Self::validate_credential(store, &credential.email, credential.password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Self::login(jwt_service, &identity)
    }
}
