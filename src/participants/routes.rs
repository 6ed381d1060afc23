use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

/// Creates the participant roster router
///
/// # Routes
/// - `POST /ride/:rideID/join-ride` - exercise a privilege
/// - `GET /ride/:rideID/participants` - roster
/// - `DELETE /ride/:rideID/participant/:participantID` - leader removal
/// - `DELETE /user/cancel-ride/:rideID` - unified cancel
pub fn participants_routes() -> Router {
    Router::new()
        .route(
            "/ride/:rideID/join-ride",
            post(handlers::join_ride_with_privilege),
        )
        .route(
            "/ride/:rideID/participants",
            get(handlers::get_ride_participants),
        )
        .route(
            "/ride/:rideID/participant/:participantID",
            delete(handlers::remove_participant),
        )
        .route(
            "/user/cancel-ride/:rideID",
            delete(handlers::cancel_ride_participation),
        )
}
