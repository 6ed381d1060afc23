//! Bearer credential verification
//!
//! The backend never issues credentials itself; it only checks tokens minted by
//! the identity provider and extracts the subject as the external user id.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::{debug, warn};

use super::models::{Claims, VerifiedIdentity};
use crate::common::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("invalid or expired token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token has an empty subject")]
    MissingSubject,
}

impl From<VerifierError> for ApiError {
    fn from(_: VerifierError) -> Self {
        ApiError::Unauthorized("Invalid or expired token".to_string())
    }
}

/// Turns a bearer credential into a stable external identity
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, VerifierError>;
}

/// Verifies HS256 identity tokens signed with a shared secret
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &str, issuer: Option<&str>, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }
        if let Some(aud) = audience {
            validation.set_audience(&[aud]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, VerifierError> {
        let decoded = decode::<Claims>(credential, &self.key, &self.validation).map_err(|e| {
            warn!(error = %e, "Identity token validation failed");
            VerifierError::InvalidToken(e)
        })?;

        let uid = decoded.claims.sub.trim().to_string();
        if uid.is_empty() {
            warn!("Identity token carried an empty subject");
            return Err(VerifierError::MissingSubject);
        }

        debug!(uid = %uid, "Identity token verified");
        Ok(VerifiedIdentity { uid })
    }
}
