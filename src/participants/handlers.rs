use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CancelResponse, JoinRideResponse, MessageResponse};
use super::services::ParticipantService;
use crate::auth::CurrentUser;
use crate::common::{parse_id, ApiError, AppState};

/// POST /ride/:rideID/join-ride - Take a seat using an approved request
pub async fn join_ride_with_privilege(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(ride_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let db = state.read().await.db.clone();
    let participant = ParticipantService::new(db)
        .join_with_privilege(ride_id, &user, Utc::now())
        .await?;

    Ok(Json(JoinRideResponse {
        message: "Successfully joined the ride! All other privileges have been cleared."
            .to_string(),
        ride_id,
        participant_id: participant.id,
    }))
}

/// DELETE /user/cancel-ride/:rideID - Cancel a pending request or give up a seat
pub async fn cancel_ride_participation(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(ride_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let db = state.read().await.db.clone();
    let outcome = ParticipantService::new(db)
        .cancel_involvement(ride_id, &user)
        .await?;

    Ok(Json(CancelResponse {
        message: outcome.message().to_string(),
        outcome,
    }))
}

/// GET /ride/:rideID/participants
pub async fn get_ride_participants(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path(ride_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let db = state.read().await.db.clone();
    let participants = ParticipantService::new(db)
        .list_participants(ride_id, &user)
        .await?;
    Ok(Json(participants))
}

/// DELETE /ride/:rideID/participant/:participantID - Leader removes a participant
pub async fn remove_participant(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    CurrentUser(user): CurrentUser,
    Path((ride_id, participant_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let ride_id = parse_id(&ride_id, "ride ID")?;
    let participant_id = parse_id(&participant_id, "participant ID")?;
    let db = state.read().await.db.clone();
    ParticipantService::new(db)
        .remove_participant(ride_id, participant_id, &user)
        .await?;

    Ok(Json(MessageResponse {
        message: "Participant removed successfully".to_string(),
    }))
}
