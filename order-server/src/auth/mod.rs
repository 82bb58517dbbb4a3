//! Authentication
//!
//! JWT token issuance and validation for the admin surface, password
//! hashing, and the axum extractors that guard handlers.

pub mod extractor;
pub mod jwt;
pub mod password;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use password::{hash_password, verify_password};
