use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{MessageResponse, UnreadCountResponse};
use super::services::NotificationService;
use crate::auth::CurrentUser;
use crate::common::{parse_id, ApiError, AppState};

/// GET /user/notifications
pub async fn get_user_notifications(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let notifications = NotificationService::new(db).list_for_user(user.id).await?;
    Ok(Json(notifications))
}

/// GET /user/notifications/unread-count
pub async fn get_unread_count(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let unread_count = NotificationService::new(db).unread_count(user.id).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// POST /notification/:notificationID/read
pub async fn mark_notification_read(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(notification_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let notification_id = parse_id(&notification_id, "notification ID")?;
    let db = state.read().await.db.clone();
    NotificationService::new(db)
        .mark_read(notification_id, user.id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Notification marked as read".to_string(),
    }))
}
