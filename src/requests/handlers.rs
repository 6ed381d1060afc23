use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::MessageResponse;
use super::services::RequestService;
use crate::auth::CurrentUser;
use crate::common::{parse_id, ApiError, AppState};

/// POST /ride/:rideID/join - Send a join request
pub async fn send_join_request(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(ride_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let db = state.read().await.db.clone();
    let request = RequestService::new(db)
        .submit(ride_id, &user, Utc::now())
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Join request sent",
        "request_id": request.id,
    })))
}

/// DELETE /ride/:rideID/cancel-request - Withdraw own pending request
pub async fn cancel_join_request(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(ride_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let db = state.read().await.db.clone();
    RequestService::new(db).cancel_pending(ride_id, &user).await?;

    Ok(Json(MessageResponse {
        message: "Join request cancelled successfully".to_string(),
    }))
}

/// GET /ride/:rideID/requests - Leader's view of pending requests
pub async fn get_ride_requests(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(ride_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let db = state.read().await.db.clone();
    let requests = RequestService::new(db).list_for_ride(ride_id, &user).await?;
    Ok(Json(requests))
}

/// POST /ride/:rideID/approve/:requestID
pub async fn approve_join_request(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path((ride_id, request_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let request_id = parse_id(&request_id, "request ID")?;
    let db = state.read().await.db.clone();
    RequestService::new(db)
        .approve(ride_id, request_id, &user)
        .await?;

    Ok(Json(MessageResponse {
        message: "Join request approved - user can now join the ride".to_string(),
    }))
}

/// POST /ride/:rideID/reject/:requestID
pub async fn reject_join_request(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path((ride_id, request_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let request_id = parse_id(&request_id, "request ID")?;
    let db = state.read().await.db.clone();
    RequestService::new(db)
        .reject(ride_id, request_id, &user, Utc::now())
        .await?;

    Ok(Json(MessageResponse {
        message: "Join request rejected".to_string(),
    }))
}

/// GET /user/requests - Requests the caller has sent
pub async fn get_sent_requests(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let requests = RequestService::new(db)
        .list_sent(user.id, Utc::now())
        .await?;
    Ok(Json(requests))
}

/// GET /user/privileges - Approved requests not yet exercised
pub async fn get_privileges(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let privileges = RequestService::new(db).privileges(user.id).await?;
    Ok(Json(privileges))
}

/// DELETE /user/clear-involvement/:date
pub async fn clear_involvement_for_date(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let outcome = RequestService::new(db)
        .clear_for_date(user.id, date.trim())
        .await?;
    Ok(Json(outcome))
}
