//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod user;

pub use user::{CredentialStore, InMemoryCredentialStore, PgCredentialStore, UserRecord, UserRepository};
