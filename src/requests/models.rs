use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle state of a join request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Revoked,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JoinRequest {
    pub id: i64,
    pub ride_id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub status: RequestStatus,
    pub revoked_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Pending request as the ride leader sees it
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PendingRequestView {
    pub request_id: i64,
    pub name: String,
    pub gender: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CooldownInfo {
    pub can_resend: bool,
    pub remaining_minutes: i64,
}

/// Row backing the caller's sent-request listing
#[derive(Debug, Clone, FromRow)]
pub struct SentRequestRow {
    pub request_id: i64,
    pub ride_id: i64,
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub price: f64,
    pub seats: i64,
    pub seats_filled: i64,
    pub status: RequestStatus,
    pub revoked_at: Option<String>,
    pub leader_name: String,
    pub requested_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentRequestView {
    pub request_id: i64,
    pub ride_id: i64,
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub price: f64,
    pub seats_available: i64,
    pub total_seats: i64,
    pub status: RequestStatus,
    pub leader_name: String,
    pub requested_at: String,
    pub updated_at: String,
    pub can_cancel: bool,
    pub can_join: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<CooldownInfo>,
}

/// An approved request the caller can exercise
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PrivilegeView {
    pub request_id: i64,
    pub ride_id: i64,
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub price: f64,
    pub seats_available: i64,
    pub total_seats: i64,
    pub can_join: bool,
    pub approved_at: String,
}

/// Outcome of clearing a user's requests for one date
#[derive(Debug, Clone, Serialize)]
pub struct ClearInvolvementResponse {
    pub message: String,
    pub cancelled_requests: u64,
    pub cancelled_privileges: u64,
    pub total_cancelled: u64,
    pub date: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
