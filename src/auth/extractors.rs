//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::common::{ApiError, AppState};
use crate::users::models::User;
use crate::users::services::UserService;

async fn app_state<S>(parts: &mut Parts, state: &S) -> Result<AppState, ApiError>
where
    S: Send + Sync,
{
    let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
        Extension::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

    let app_state = state_lock.read().await.clone();
    Ok(app_state)
}

/// Pulls the credential out of an `Authorization: Bearer <token>` header
pub fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = match parts.headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        Some(h) => h,
        None => {
            warn!("Authentication failed: missing Authorization header");
            return Err(ApiError::Unauthorized(
                "Authorization header missing".to_string(),
            ));
        }
    };

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => {
            warn!("Authentication failed: malformed Authorization header");
            Err(ApiError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
        }
    }
}

/// Verified external identity of the caller
///
/// No user record is required, which is what profile creation needs.
#[derive(Debug, Clone)]
pub struct AuthedIdentity {
    pub uid: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = app_state(parts, state).await?;

        if app_state.dev_mode.is_enabled() {
            debug!(uid = %app_state.dev_mode.user_uid, "DEV MODE: credential check bypassed");
            return Ok(AuthedIdentity {
                uid: app_state.dev_mode.user_uid.clone(),
            });
        }

        let token = bearer_token(parts)?;
        let identity = app_state.verifier.verify(token).await?;

        Ok(AuthedIdentity { uid: identity.uid })
    }
}

/// Caller resolved to their internal user record
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = AuthedIdentity::from_request_parts(parts, state).await?;
        let app_state = app_state(parts, state).await?;

        let user = UserService::new(app_state.db)
            .find_by_external_uid(&identity.uid)
            .await?;

        match user {
            Some(u) => {
                debug!(user_id = u.id, "Caller resolved to user record");
                Ok(CurrentUser(u))
            }
            None => {
                warn!(uid = %identity.uid, "Authenticated identity has no user profile");
                Err(ApiError::NotFound("User not found".to_string()))
            }
        }
    }
}
