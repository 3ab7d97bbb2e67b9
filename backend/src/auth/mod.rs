//! Authentication module
//!
//! Provides JWT issuance, password verification and the two request guards
//! (authenticator, then authorizer) that protect every matched route.

mod claims;
mod guard;
mod jwt;
mod middleware;
mod password;
mod policy;

pub use claims::{Claims, IdentityClaims};
pub use guard::{authenticate, authorize, bearer_token, Access};
pub use jwt::JwtService;
pub use middleware::{authenticate_request, authorize_request, AuthUser};
pub use password::PasswordService;
pub use policy::{RoutePolicy, RouteTable};
