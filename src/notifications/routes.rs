use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn notifications_routes() -> Router {
    Router::new()
        .route("/user/notifications", get(handlers::get_user_notifications))
        .route(
            "/user/notifications/unread-count",
            get(handlers::get_unread_count),
        )
        .route(
            "/notification/:notificationID/read",
            post(handlers::mark_notification_read),
        )
}
