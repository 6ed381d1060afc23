use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, info};

use super::models::{CreateRideRequest, LeaderContact, Ride, RideFilter};
use super::validators::{validate_date_param, RideValidator};
use crate::common::{ApiError, Validator};
use crate::notifications::{NewNotification, NotificationService};
use crate::users::{User, UserService};

/// Result of a committed ride deletion
#[derive(Debug)]
pub struct RideDeletion {
    pub ride_id: i64,
    pub participants_notified: usize,
}

pub struct RideService {
    db: SqlitePool,
}

impl RideService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_ride(&self, ride_id: i64) -> Result<Option<Ride>, ApiError> {
        let ride = sqlx::query_as::<_, Ride>("SELECT * FROM rides WHERE id = ?")
            .bind(ride_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(ride)
    }

    pub async fn get_ride(&self, ride_id: i64) -> Result<Ride, ApiError> {
        self.find_ride(ride_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))
    }

    /// Fetch a ride and require `actor` to be its leader
    pub async fn get_led_ride(&self, ride_id: i64, actor: &User) -> Result<Ride, ApiError> {
        let ride = self.get_ride(ride_id).await?;
        if !ride.is_led_by(actor.id) {
            return Err(ApiError::Forbidden(
                "You are not the leader of this ride".to_string(),
            ));
        }
        Ok(ride)
    }

    /// Post a new ride led by `leader`
    pub async fn create_ride(
        &self,
        leader: &User,
        request: CreateRideRequest,
    ) -> Result<Ride, ApiError> {
        RideValidator.validate(&request).into_result()?;

        let date = request.date.trim();

        // leading and requesting are mutually exclusive on one date
        let (active_requests,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM join_requests jr
            JOIN rides r ON r.id = jr.ride_id
            WHERE jr.user_id = ? AND r.date = ? AND jr.status IN ('pending', 'approved')
            "#,
        )
        .bind(leader.id)
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        if active_requests > 0 {
            return Err(ApiError::Conflict(format!(
                "You cannot create a ride and send join requests on the same day. You have already sent requests for rides on {}",
                date
            )));
        }

        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO rides (leader_id, origin, destination, date, time, seats, seats_filled, price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
            "#,
        )
        .bind(leader.id)
        .bind(request.origin.trim())
        .bind(request.destination.trim())
        .bind(date)
        .bind(request.time.trim())
        .bind(request.seats)
        .bind(request.price)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?;

        let ride = self.get_ride(result.last_insert_rowid()).await?;

        info!(
            ride_id = ride.id,
            leader_id = leader.id,
            date = %ride.date,
            seats = ride.seats,
            "Ride created"
        );

        Ok(ride)
    }

    /// Public search; every supplied criterion must match exactly
    pub async fn filter_rides(&self, filter: &RideFilter) -> Result<Vec<Ride>, ApiError> {
        let origin = filter.origin.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let destination = filter
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let date = filter.date.as_deref().map(str::trim).filter(|s| !s.is_empty());

        if let Some(d) = date {
            validate_date_param(d)?;
        }

        let rides = sqlx::query_as::<_, Ride>(
            r#"
            SELECT * FROM rides
            WHERE (?1 IS NULL OR origin = ?1)
              AND (?2 IS NULL OR destination = ?2)
              AND (?3 IS NULL OR date = ?3)
            ORDER BY date ASC, time ASC, id ASC
            "#,
        )
        .bind(origin)
        .bind(destination)
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(rides)
    }

    pub async fn rides_posted_by(&self, user_id: i64) -> Result<Vec<Ride>, ApiError> {
        let rides = sqlx::query_as::<_, Ride>(
            "SELECT * FROM rides WHERE leader_id = ? ORDER BY date ASC, time ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rides)
    }

    /// Rides the user actually occupies a seat in
    pub async fn rides_joined_by(&self, user_id: i64) -> Result<Vec<Ride>, ApiError> {
        let rides = sqlx::query_as::<_, Ride>(
            r#"
            SELECT r.* FROM rides r
            JOIN participants p ON p.ride_id = r.id
            WHERE p.user_id = ?
            ORDER BY r.date ASC, r.time ASC, r.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rides)
    }

    pub async fn leader_contact(&self, ride_id: i64) -> Result<LeaderContact, ApiError> {
        let ride = self.get_ride(ride_id).await?;
        let leader = UserService::new(self.db.clone())
            .find_by_id(ride.leader_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Leader not found".to_string()))?;

        Ok(LeaderContact {
            name: leader.name,
            gender: leader.gender,
            phone: leader.phone,
        })
    }

    /// Delete a ride and everything hanging off it, then tell former participants.
    ///
    /// Participants, notifications, join requests and the ride row go in one
    /// transaction; a failure at any step leaves all of them in place. The
    /// roster to notify is whatever the participants delete removed.
    pub async fn delete_ride(&self, ride_id: i64, actor: &User) -> Result<RideDeletion, ApiError> {
        let ride = self.get_led_ride(ride_id, actor).await?;

        let mut tx = self.db.begin().await?;

        // first statement writes, so the transaction holds the write lock from here on
        let participant_ids: Vec<(i64,)> = match sqlx::query_as(
            "DELETE FROM participants WHERE ride_id = ? RETURNING user_id",
        )
        .bind(ride_id)
        .fetch_all(&mut *tx)
        .await
        {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, ride_id = ride_id, table = "participants", "Ride cascade delete failed, rolling back");
                tx.rollback().await?;
                return Err(ApiError::DatabaseError(e));
            }
        };

        for (table, statement) in [
            ("notifications", "DELETE FROM notifications WHERE ride_id = ?"),
            ("join_requests", "DELETE FROM join_requests WHERE ride_id = ?"),
            ("rides", "DELETE FROM rides WHERE id = ?"),
        ] {
            if let Err(e) = sqlx::query(statement).bind(ride_id).execute(&mut *tx).await {
                error!(error = %e, ride_id = ride_id, table = table, "Ride cascade delete failed, rolling back");
                tx.rollback().await?;
                return Err(ApiError::DatabaseError(e));
            }
        }

        tx.commit().await?;

        info!(
            ride_id = ride_id,
            leader_id = actor.id,
            participants = participant_ids.len(),
            "Ride deleted"
        );

        let notifications = NotificationService::new(self.db.clone());
        let mut participants_notified = 0;
        for (user_id,) in participant_ids {
            if notifications
                .notify(NewNotification::ride_cancelled(user_id, &ride, &actor.name))
                .await
            {
                participants_notified += 1;
            }
        }

        Ok(RideDeletion {
            ride_id,
            participants_notified,
        })
    }
}
