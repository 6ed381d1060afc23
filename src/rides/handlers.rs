use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CreateRideRequest, CreateRideResponse, DeleteRideResponse, RideFilter};
use super::services::RideService;
use crate::auth::{AuthedIdentity, CurrentUser};
use crate::common::{parse_id, ApiError, AppState};

/// POST /ride - Post a ride with the caller as leader
pub async fn create_ride(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateRideRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let ride = RideService::new(db).create_ride(&user, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRideResponse {
            message: "Ride created successfully".to_string(),
            ride,
        }),
    ))
}

/// GET /ride/filter - Public ride search
pub async fn filter_rides(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Query(filter): Query<RideFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let rides = RideService::new(db).filter_rides(&filter).await?;
    Ok(Json(rides))
}

/// GET /ride/:rideID/leader - Leader's contact details
pub async fn get_ride_leader(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    _identity: AuthedIdentity,
    Path(ride_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let db = state.read().await.db.clone();
    let contact = RideService::new(db).leader_contact(ride_id).await?;
    Ok(Json(contact))
}

/// DELETE /ride/:rideID - Leader deletes the ride
pub async fn delete_ride(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(ride_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let db = state.read().await.db.clone();
    let deletion = RideService::new(db).delete_ride(ride_id, &user).await?;

    Ok(Json(DeleteRideResponse {
        message: "Ride deleted successfully".to_string(),
        participants_notified: deletion.participants_notified,
        ride_id: deletion.ride_id,
    }))
}

/// GET /user/rides/posted
pub async fn get_posted_rides(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let rides = RideService::new(db).rides_posted_by(user.id).await?;
    Ok(Json(rides))
}

/// GET /user/rides/joined
pub async fn get_joined_rides(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let rides = RideService::new(db).rides_joined_by(user.id).await?;
    Ok(Json(rides))
}
