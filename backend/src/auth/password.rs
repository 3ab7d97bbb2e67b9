//! Password hashing and verification
//!
//! New hashes are Argon2id PHC strings. Records imported from the previous
//! store carry bcrypt hashes (`$2a$`, `$2b$`, `$2y$`), which are still
//! accepted for verification.
//!
//! Both algorithms are intentionally CPU-intensive; async callers go
//! through the `*_async` variants, which run on the blocking pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Stand-in hash verified when no user matches, so a miss costs the same
/// as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("no-such-user-placeholder").ok());

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: SecretString) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(password.expose_secret()))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` on mismatch and `Err` only when the stored hash
    /// cannot be parsed.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix)) {
            return bcrypt::verify(password, hash)
                .map_err(|e| anyhow::anyhow!("Invalid bcrypt hash: {}", e));
        }

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: SecretString, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(password.expose_secret(), &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Burn one verification against a fixed hash; always `false`
    pub async fn verify_dummy_async(password: SecretString) -> bool {
        tokio::task::spawn_blocking(move || {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = Self::verify(password.expose_secret(), hash);
            }
        })
        .await
        .ok();
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hash = PasswordService::hash(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "test_password";
        let hash1 = PasswordService::hash(password).unwrap();
        let hash2 = PasswordService::hash(password).unwrap();

        // Random salt
        assert_ne!(hash1, hash2);
        assert!(PasswordService::verify(password, &hash1).unwrap());
        assert!(PasswordService::verify(password, &hash2).unwrap());
    }

    #[test]
    fn test_verify_legacy_bcrypt_hash() {
        let hash = bcrypt::hash("legacy_password", 4).unwrap();

        assert!(PasswordService::verify("legacy_password", &hash).unwrap());
        assert!(!PasswordService::verify("other_password", &hash).unwrap());
    }

    #[test]
    fn test_unparseable_hash_is_an_error() {
        assert!(PasswordService::verify("anything", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password";
        let hash = PasswordService::hash_async(SecretString::new(password.to_string()))
            .await
            .unwrap();

        assert!(
            PasswordService::verify_async(SecretString::new(password.to_string()), hash.clone())
                .await
                .unwrap()
        );
        assert!(
            !PasswordService::verify_async(SecretString::new("wrong".to_string()), hash)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_dummy_verification_never_matches() {
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));

        for candidate in ["no-such-user-placeholder", "anything"] {
            let password = SecretString::new(candidate.to_string());
            assert!(!PasswordService::verify_dummy_async(password).await);
        }
    }
}
