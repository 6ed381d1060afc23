use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Participant {
    pub id: i64,
    pub ride_id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub joined_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Roster row joined with the participant's profile
#[derive(Debug, Clone, FromRow)]
pub struct RosterRow {
    pub participant_id: i64,
    pub name: String,
    pub gender: String,
    pub phone: String,
    pub joined_at: String,
}

/// Roster entry; `phone` is only present for the ride's leader
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub participant_id: i64,
    pub name: String,
    pub gender: String,
    pub joined_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ParticipantView {
    pub fn from_row(row: RosterRow, show_phone: bool) -> Self {
        Self {
            participant_id: row.participant_id,
            name: row.name,
            gender: row.gender,
            joined_at: row.joined_at,
            phone: show_phone.then_some(row.phone),
        }
    }
}

/// What a unified cancel undid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    RequestCancelled,
    ParticipationCancelled,
}

impl CancelOutcome {
    pub fn message(self) -> &'static str {
        match self {
            CancelOutcome::RequestCancelled => "Join request cancelled successfully",
            CancelOutcome::ParticipationCancelled => {
                "Successfully cancelled your participation in the ride"
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
    #[serde(rename = "type")]
    pub outcome: CancelOutcome,
}

#[derive(Debug, Serialize)]
pub struct JoinRideResponse {
    pub message: String,
    pub ride_id: i64,
    pub participant_id: i64,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
