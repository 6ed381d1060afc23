use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ride {
    pub id: i64,
    pub leader_id: i64,
    pub origin: String,
    pub destination: String,
    pub date: String, // YYYY-MM-DD
    pub time: String, // HH:MM
    pub seats: i64,
    pub seats_filled: i64,
    pub price: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl Ride {
    pub fn is_full(&self) -> bool {
        self.seats_filled >= self.seats
    }

    pub fn is_led_by(&self, user_id: i64) -> bool {
        self.leader_id == user_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRideRequest {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub seats: i64,
    #[serde(default)]
    pub price: f64,
}

/// Query string of `GET /ride/filter`; omitted parameters do not filter
#[derive(Debug, Default, Deserialize)]
pub struct RideFilter {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderContact {
    pub name: String,
    pub gender: String,
    pub phone: String,
}

#[derive(Serialize)]
pub struct CreateRideResponse {
    pub message: String,
    pub ride: Ride,
}

#[derive(Debug, Serialize)]
pub struct DeleteRideResponse {
    pub message: String,
    pub participants_notified: usize,
    pub ride_id: i64,
}
