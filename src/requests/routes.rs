use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

/// Creates the join-request router
///
/// # Routes
/// - `POST /ride/:rideID/join` - send a request
/// - `DELETE /ride/:rideID/cancel-request` - withdraw a pending request
/// - `GET /ride/:rideID/requests` - leader lists pending requests
/// - `POST /ride/:rideID/approve/:requestID` / `POST /ride/:rideID/reject/:requestID`
/// - `GET /user/requests` / `GET /user/privileges`
/// - `DELETE /user/clear-involvement/:date`
pub fn requests_routes() -> Router {
    Router::new()
        .route("/ride/:rideID/join", post(handlers::send_join_request))
        .route(
            "/ride/:rideID/cancel-request",
            delete(handlers::cancel_join_request),
        )
        .route("/ride/:rideID/requests", get(handlers::get_ride_requests))
        .route(
            "/ride/:rideID/approve/:requestID",
            post(handlers::approve_join_request),
        )
        .route(
            "/ride/:rideID/reject/:requestID",
            post(handlers::reject_join_request),
        )
        .route("/user/requests", get(handlers::get_sent_requests))
        .route("/user/privileges", get(handlers::get_privileges))
        .route(
            "/user/clear-involvement/:date",
            delete(handlers::clear_involvement_for_date),
        )
}
