use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::rides::models::Ride;

/// Type tag stored with every notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum NotificationKind {
    RequestApproved,
    ParticipantRemoved,
    ParticipantCancelled,
    RideCancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub ride_id: i64,
    pub is_read: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A notification joined with its ride for display
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NotificationView {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub ride_id: i64,
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub ride_id: i64,
}

impl NewNotification {
    pub fn request_approved(user_id: i64, ride: &Ride) -> Self {
        Self {
            user_id,
            title: "Join Request Approved".to_string(),
            message: format!(
                "Your request to join the ride from {} to {} on {} at {} has been approved. You can now join the ride!",
                ride.origin, ride.destination, ride.date, ride.time
            ),
            kind: NotificationKind::RequestApproved,
            ride_id: ride.id,
        }
    }

    pub fn participant_removed(user_id: i64, ride: &Ride) -> Self {
        Self {
            user_id,
            title: "Removed from Ride".to_string(),
            message: format!(
                "You have been removed from the ride from {} to {} on {} at {}",
                ride.origin, ride.destination, ride.date, ride.time
            ),
            kind: NotificationKind::ParticipantRemoved,
            ride_id: ride.id,
        }
    }

    pub fn participant_cancelled(ride: &Ride, participant_name: &str) -> Self {
        Self {
            user_id: ride.leader_id,
            title: "Participant Cancelled".to_string(),
            message: format!(
                "{} has cancelled their participation in your ride from {} to {} on {} at {}",
                participant_name, ride.origin, ride.destination, ride.date, ride.time
            ),
            kind: NotificationKind::ParticipantCancelled,
            ride_id: ride.id,
        }
    }

    pub fn ride_cancelled(user_id: i64, ride: &Ride, leader_name: &str) -> Self {
        Self {
            user_id,
            title: "Ride Cancelled by Leader".to_string(),
            message: format!(
                "The ride from {} to {} on {} at {} has been cancelled by the leader {}",
                ride.origin, ride.destination, ride.date, ride.time, leader_name
            ),
            kind: NotificationKind::RideCancelled,
            ride_id: ride.id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
