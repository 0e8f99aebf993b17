//! Authentication for the projecthub server.
//!
//! Covers password hashing, dual-token issuance (short-lived access JWT,
//! long-lived refresh JWT persisted server-side), session rotation and
//! revocation, and the bearer-token request extractor.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod service;
pub mod tokens;

pub use middleware::AuthUser;
pub use password::{hash_password, verify_password};
pub use service::{AuthService, LoginOutcome, RefreshOutcome};
pub use tokens::{AccessClaims, RefreshClaims, TokenIssuer};
