//! Portfolio API Shared Library
//!
//! Request and response types shared between the API server and its
//! clients, plus the input validation they rely on.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
