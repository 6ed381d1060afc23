use axum::{routing::get, Router};

use super::handlers;

/// Creates the user directory router
///
/// # Routes
/// - `POST /user` - create profile on first sight
/// - `GET /user` / `PUT /user` - read and update own profile
/// - `GET /user/:userID` - public profile
pub fn users_routes() -> Router {
    Router::new()
        .route(
            "/user",
            get(handlers::get_current_user)
                .post(handlers::create_user)
                .put(handlers::update_current_user),
        )
        .route("/user/:userID", get(handlers::get_user_basic))
}
