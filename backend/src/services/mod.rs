//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the password verifier and the token issuer.

pub mod auth;
pub mod user;

pub use auth::{AuthService, Credential};
pub use user::UserService;
