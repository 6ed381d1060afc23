use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

/// Creates the ride catalog router
///
/// # Routes
/// - `POST /ride` - post a ride
/// - `GET /ride/filter` - public search by origin, destination and date
/// - `GET /ride/:rideID/leader` - leader contact
/// - `DELETE /ride/:rideID` - leader deletes a ride
/// - `GET /user/rides/posted` / `GET /user/rides/joined`
pub fn rides_routes() -> Router {
    Router::new()
        .route("/ride", post(handlers::create_ride))
        .route("/ride/filter", get(handlers::filter_rides))
        .route("/ride/:rideID", delete(handlers::delete_ride))
        .route("/ride/:rideID/leader", get(handlers::get_ride_leader))
        .route("/user/rides/posted", get(handlers::get_posted_rides))
        .route("/user/rides/joined", get(handlers::get_joined_rides))
}
