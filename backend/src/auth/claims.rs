//! Token claims and the identity they carry

use portfolio_shared::IdentityProfile;
use serde::{Deserialize, Serialize};

/// JWT claims as they appear on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Role snapshot taken at login
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Verified identity attached to a request
///
/// Roles are whatever the user held when the token was issued; they are not
/// re-read from the credential store while the token is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub user_id: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl IdentityClaims {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            roles,
        }
    }

    /// True if any of `required` is held
    pub fn has_any_role<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        required.into_iter().any(|role| self.roles.contains(role))
    }
}

impl From<Claims> for IdentityClaims {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

impl From<IdentityClaims> for IdentityProfile {
    fn from(identity: IdentityClaims) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            roles: identity.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_any_role() {
        let identity = IdentityClaims::new("u1", "a@b.com", vec!["editor".to_string()]);
        let editor = vec!["admin".to_string(), "editor".to_string()];
        let admin = vec!["admin".to_string()];

        assert!(identity.has_any_role(&editor));
        assert!(!identity.has_any_role(&admin));
        assert!(!identity.has_any_role(&Vec::<String>::new()));
    }

    #[test]
    fn test_claims_without_roles_deserialize_empty() {
        let json = r#"{"sub":"u1","email":"a@b.com","iat":1,"exp":2}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert!(claims.roles.is_empty());
    }
}
