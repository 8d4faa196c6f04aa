//! Auth Module
//!
//! JWT validation and the request-scoped identity. Token issuance is an
//! external concern; this server only verifies.

pub mod extractor;
pub mod jwt;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtService};
