use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CreateUserRequest, UpdateUserRequest};
use super::services::UserService;
use crate::auth::{AuthedIdentity, CurrentUser};
use crate::common::{parse_id, ApiError, AppState};

/// POST /user - Create the caller's profile (idempotent per identity)
pub async fn create_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    identity: AuthedIdentity,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let (user, created) = UserService::new(db)
        .create_if_absent(&identity.uid, request)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(user)))
}

/// GET /user - Current user's profile
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(user)
}

/// PUT /user - Update current user's profile
pub async fn update_current_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let updated = UserService::new(db).update_profile(&user, request).await?;
    Ok(Json(updated))
}

/// GET /user/:userID - Name and gender of any user
pub async fn get_user_basic(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    _identity: AuthedIdentity,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_id(&user_id, "user ID")?;
    let db = state.read().await.db.clone();
    let profile = UserService::new(db).public_profile(user_id).await?;
    Ok(Json(profile))
}
