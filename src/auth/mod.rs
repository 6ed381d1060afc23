//! # Auth Module
//!
//! Credential handling for every protected route:
//! - `IdentityVerifier` trait and its JWT implementation
//! - `AuthedIdentity` extractor (verified external id)
//! - `CurrentUser` extractor (identity resolved to a user record)

pub mod extractors;
pub mod models;
pub mod verifier;


pub use extractors::{AuthedIdentity, CurrentUser};
pub use verifier::{IdentityVerifier, JwtIdentityVerifier};
