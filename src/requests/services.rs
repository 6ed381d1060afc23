use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::cooldown::{cooldown_info, parse_revoked_at, remaining_cooldown_minutes};
use super::models::{
    ClearInvolvementResponse, JoinRequest, PendingRequestView, PrivilegeView, RequestStatus,
    SentRequestRow, SentRequestView,
};
use crate::common::{is_unique_violation, ApiError};
use crate::notifications::{NewNotification, NotificationService};
use crate::rides::validators::validate_date_param;
use crate::rides::{Ride, RideService};
use crate::users::User;

/// Join-request lifecycle: submit, decide, cancel and list
pub struct RequestService {
    db: SqlitePool,
}

impl RequestService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Send a join request for `ride_id` on behalf of `user`.
    ///
    /// A revoked request blocks resubmission for the cooldown window; after it
    /// the stale record is replaced by the new pending one.
    pub async fn submit(
        &self,
        ride_id: i64,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<JoinRequest, ApiError> {
        let ride = RideService::new(self.db.clone()).get_ride(ride_id).await?;

        // leading and requesting are mutually exclusive on one date
        let (led_that_day,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM rides WHERE leader_id = ? AND date = ?")
                .bind(user.id)
                .bind(&ride.date)
                .fetch_one(&self.db)
                .await?;

        if led_that_day > 0 {
            return Err(ApiError::Conflict(format!(
                "You cannot send a join request and create a ride on the same day. You have already created a ride for {}",
                ride.date
            )));
        }

        let existing = sqlx::query_as::<_, JoinRequest>(
            "SELECT * FROM join_requests WHERE ride_id = ? AND user_id = ? ORDER BY id DESC",
        )
        .bind(ride_id)
        .bind(user.id)
        .fetch_all(&self.db)
        .await?;

        for request in &existing {
            match request.status {
                RequestStatus::Pending => {
                    return Err(ApiError::Conflict("Request already pending".to_string()))
                }
                RequestStatus::Approved => {
                    return Err(ApiError::Conflict(
                        "Already approved for this ride".to_string(),
                    ))
                }
                RequestStatus::Revoked => {}
            }
        }

        for request in &existing {
            let revoked_at = request.revoked_at.as_deref().and_then(parse_revoked_at);
            if let Some(minutes) = revoked_at.and_then(|at| remaining_cooldown_minutes(at, now)) {
                debug!(
                    ride_id = ride_id,
                    user_id = user.id,
                    remaining_minutes = minutes,
                    "Join request blocked by cooldown"
                );
                return Err(ApiError::CooldownActive {
                    message: format!(
                        "Request was revoked. Please wait {} more minutes before resending.",
                        minutes
                    ),
                    remaining_minutes: minutes,
                });
            }
        }

        let stamp = now.to_rfc3339();
        let mut tx = self.db.begin().await?;

        let cleared = sqlx::query(
            "DELETE FROM join_requests WHERE ride_id = ? AND user_id = ? AND status = 'revoked'",
        )
        .bind(ride_id)
        .bind(user.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let inserted = sqlx::query(
            r#"
            INSERT INTO join_requests (ride_id, user_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(ride_id)
        .bind(user.id)
        .bind(RequestStatus::Pending)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&mut *tx)
        .await;

        let request_id = match inserted {
            Ok(result) => result.last_insert_rowid(),
            // a concurrent submit for the same pair got there first
            Err(e) if is_unique_violation(&e) => {
                return Err(ApiError::Conflict("Request already pending".to_string()))
            }
            Err(e) => return Err(ApiError::DatabaseError(e)),
        };

        let request = sqlx::query_as::<_, JoinRequest>("SELECT * FROM join_requests WHERE id = ?")
            .bind(request_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            request_id = request.id,
            ride_id = ride_id,
            user_id = user.id,
            stale_revoked_cleared = cleared,
            "Join request sent"
        );

        Ok(request)
    }

    /// Pending request `request_id` on a ride led by `actor`
    async fn pending_for_leader(
        &self,
        ride_id: i64,
        request_id: i64,
        actor: &User,
    ) -> Result<(Ride, JoinRequest), ApiError> {
        let ride = RideService::new(self.db.clone())
            .get_led_ride(ride_id, actor)
            .await?;

        let request = sqlx::query_as::<_, JoinRequest>(
            "SELECT * FROM join_requests WHERE id = ? AND ride_id = ? AND status = 'pending'",
        )
        .bind(request_id)
        .bind(ride_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Join request not found or already processed".to_string())
        })?;

        Ok((ride, request))
    }

    /// Grant the requester the privilege to join; no seat is reserved
    pub async fn approve(
        &self,
        ride_id: i64,
        request_id: i64,
        actor: &User,
    ) -> Result<JoinRequest, ApiError> {
        let (ride, request) = self.pending_for_leader(ride_id, request_id, actor).await?;

        let updated = sqlx::query(
            "UPDATE join_requests SET status = 'approved', updated_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(request.id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(ApiError::NotFound(
                "Join request not found or already processed".to_string(),
            ));
        }

        info!(
            request_id = request.id,
            ride_id = ride_id,
            requester_id = request.user_id,
            "Join request approved"
        );

        NotificationService::new(self.db.clone())
            .notify(NewNotification::request_approved(request.user_id, &ride))
            .await;

        self.get_request(request.id).await
    }

    /// Revoke a pending request and start the requester's cooldown.
    /// The requester is not notified.
    pub async fn reject(
        &self,
        ride_id: i64,
        request_id: i64,
        actor: &User,
        now: DateTime<Utc>,
    ) -> Result<JoinRequest, ApiError> {
        let (_, request) = self.pending_for_leader(ride_id, request_id, actor).await?;

        let stamp = now.to_rfc3339();
        let updated = sqlx::query(
            r#"
            UPDATE join_requests SET status = 'revoked', revoked_at = ?, updated_at = ?
            WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(&stamp)
        .bind(&stamp)
        .bind(request.id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(ApiError::NotFound(
                "Join request not found or already processed".to_string(),
            ));
        }

        info!(
            request_id = request.id,
            ride_id = ride_id,
            requester_id = request.user_id,
            "Join request rejected"
        );

        self.get_request(request.id).await
    }

    /// Withdraw the caller's own pending request
    pub async fn cancel_pending(&self, ride_id: i64, user: &User) -> Result<(), ApiError> {
        if !self.delete_pending(ride_id, user.id).await? {
            return Err(ApiError::NotFound(
                "No pending request found for this ride".to_string(),
            ));
        }
        Ok(())
    }

    /// Delete a pending request for the pair; `false` when there was none
    pub async fn delete_pending(&self, ride_id: i64, user_id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "DELETE FROM join_requests WHERE ride_id = ? AND user_id = ? AND status = 'pending'",
        )
        .bind(ride_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(ride_id = ride_id, user_id = user_id, "Pending join request cancelled");
        }
        Ok(deleted)
    }

    pub async fn get_request(&self, request_id: i64) -> Result<JoinRequest, ApiError> {
        sqlx::query_as::<_, JoinRequest>("SELECT * FROM join_requests WHERE id = ?")
            .bind(request_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Join request not found".to_string()))
    }

    /// Pending requests on a ride, for its leader
    pub async fn list_for_ride(
        &self,
        ride_id: i64,
        actor: &User,
    ) -> Result<Vec<PendingRequestView>, ApiError> {
        RideService::new(self.db.clone())
            .get_led_ride(ride_id, actor)
            .await?;

        let requests = sqlx::query_as::<_, PendingRequestView>(
            r#"
            SELECT jr.id AS request_id, u.name, u.gender, jr.status
            FROM join_requests jr
            JOIN users u ON u.id = jr.user_id
            WHERE jr.ride_id = ? AND jr.status = 'pending'
            ORDER BY jr.created_at ASC, jr.id ASC
            "#,
        )
        .bind(ride_id)
        .fetch_all(&self.db)
        .await?;

        Ok(requests)
    }

    /// Every request the user has sent, newest first, with the actions open to them
    pub async fn list_sent(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<SentRequestView>, ApiError> {
        let rows = sqlx::query_as::<_, SentRequestRow>(
            r#"
            SELECT jr.id AS request_id, r.id AS ride_id, r.origin, r.destination, r.date, r.time,
                   r.price, r.seats, r.seats_filled, jr.status, jr.revoked_at,
                   leader.name AS leader_name, jr.created_at AS requested_at, jr.updated_at
            FROM join_requests jr
            JOIN rides r ON r.id = jr.ride_id
            JOIN users leader ON leader.id = r.leader_id
            WHERE jr.user_id = ?
            ORDER BY jr.created_at DESC, jr.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let views = rows
            .into_iter()
            .map(|row| {
                let cooldown = (row.status == RequestStatus::Revoked)
                    .then(|| cooldown_info(row.revoked_at.as_deref(), now));
                SentRequestView {
                    can_cancel: row.status == RequestStatus::Pending,
                    can_join: row.status == RequestStatus::Approved
                        && row.seats_filled < row.seats,
                    seats_available: (row.seats - row.seats_filled).max(0),
                    total_seats: row.seats,
                    request_id: row.request_id,
                    ride_id: row.ride_id,
                    origin: row.origin,
                    destination: row.destination,
                    date: row.date,
                    time: row.time,
                    price: row.price,
                    status: row.status,
                    leader_name: row.leader_name,
                    requested_at: row.requested_at,
                    updated_at: row.updated_at,
                    cooldown,
                }
            })
            .collect();

        Ok(views)
    }

    /// Approved requests the user has not exercised yet
    pub async fn privileges(&self, user_id: i64) -> Result<Vec<PrivilegeView>, ApiError> {
        let privileges = sqlx::query_as::<_, PrivilegeView>(
            r#"
            SELECT jr.id AS request_id, r.id AS ride_id, r.origin, r.destination, r.date, r.time,
                   r.price, r.seats - r.seats_filled AS seats_available, r.seats AS total_seats,
                   r.seats_filled < r.seats AS can_join, jr.updated_at AS approved_at
            FROM join_requests jr
            JOIN rides r ON r.id = jr.ride_id
            WHERE jr.user_id = ? AND jr.status = 'approved'
            ORDER BY r.date ASC, r.time ASC, jr.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(privileges)
    }

    /// Drop every pending and approved request the user holds for rides on `date`
    pub async fn clear_for_date(
        &self,
        user_id: i64,
        date: &str,
    ) -> Result<ClearInvolvementResponse, ApiError> {
        validate_date_param(date)?;

        let mut tx = self.db.begin().await?;

        let mut cleared = [0u64; 2];
        for (slot, status) in [RequestStatus::Pending, RequestStatus::Approved]
            .into_iter()
            .enumerate()
        {
            cleared[slot] = sqlx::query(
                r#"
                DELETE FROM join_requests
                WHERE user_id = ? AND status = ?
                  AND ride_id IN (SELECT id FROM rides WHERE date = ?)
                "#,
            )
            .bind(user_id)
            .bind(status)
            .bind(date)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;

        let [cancelled_requests, cancelled_privileges] = cleared;
        let total_cancelled = cancelled_requests + cancelled_privileges;

        let message = if total_cancelled == 0 {
            format!("No requests or privileges to cancel for {}", date)
        } else {
            info!(
                user_id = user_id,
                date = date,
                cancelled_requests = cancelled_requests,
                cancelled_privileges = cancelled_privileges,
                "Cleared ride involvement for date"
            );
            format!("Successfully cleared all ride involvement for {}", date)
        };

        Ok(ClearInvolvementResponse {
            message,
            cancelled_requests,
            cancelled_privileges,
            total_cancelled,
            date: date.to_string(),
        })
    }
}
