//! JWT token generation and validation
//!
//! Tokens are HS256 signed and carry the caller's id, email and roles.
//! Keys are derived once and shared behind an `Arc`.

use super::claims::{Claims, IdentityClaims};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
///
/// Create once at start-up and store in `AppState`, never per request.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    access_token_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_expiry_secs: i64, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            access_token_expiry_secs,
        }
    }

    /// Issue a signed access token for an already verified identity
    #[inline]
    pub fn issue(&self, identity: &IdentityClaims) -> Result<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub(crate) fn issue_at(&self, identity: &IdentityClaims, now: DateTime<Utc>) -> Result<String> {
        let exp = now + Duration::seconds(self.access_token_expiry_secs);

        let claims = Claims {
            sub: identity.user_id.clone(),
            email: identity.email.clone(),
            roles: identity.roles.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign access token: {}", e))
    }

    /// Check signature and expiry and return the embedded identity
    pub fn verify(&self, token: &str) -> Result<IdentityClaims> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims.into())
    }

    /// Get access token lifetime in seconds
    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600, 0)
    }

    fn admin_identity() -> IdentityClaims {
        IdentityClaims::new("u1", "a@b.com", vec!["admin".to_string()])
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = create_test_service();

        let token = service.issue(&admin_identity()).unwrap();
        let identity = service.verify(&token).unwrap();

        assert_eq!(identity.user_id, "u1");
        assert_eq!(identity.email, "a@b.com");
        assert_eq!(identity.roles, vec!["admin".to_string()]);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let issued = Utc::now() - Duration::hours(2);

        let token = service.issue_at(&admin_identity(), issued).unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_leeway_tolerates_small_skew() {
        let service = JwtService::new("test-secret", 3600, 120);
        // Expired 60 seconds ago, inside the 120 second leeway
        let issued = Utc::now() - Duration::seconds(3660);

        let token = service.issue_at(&admin_identity(), issued).unwrap();

        assert!(service.verify(&token).is_ok());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let service = create_test_service();
        let other = JwtService::new("another-secret", 3600, 0);

        let token = other.issue(&admin_identity()).unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.verify("invalid.token.here").is_err());
        assert!(service.verify("").is_err());
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let cloned = service.clone();
        assert!(Arc::ptr_eq(&service.keys.encoding, &cloned.keys.encoding));
    }
}
