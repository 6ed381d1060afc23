//! Authentication data models

use serde::{Deserialize, Serialize};

/// Claims carried by an identity token
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Stable external identity produced by a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
}
