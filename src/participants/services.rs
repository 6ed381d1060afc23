use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};

use super::models::{CancelOutcome, Participant, ParticipantView, RosterRow};
use crate::common::{is_unique_violation, ApiError};
use crate::notifications::{NewNotification, NotificationService};
use crate::requests::RequestService;
use crate::rides::{Ride, RideService};
use crate::users::User;

/// Seat holders of each ride and the seat counter kept in step with them
pub struct ParticipantService {
    db: SqlitePool,
}

async fn ride_in_tx(tx: &mut Transaction<'_, Sqlite>, ride_id: i64) -> Result<Ride, ApiError> {
    sqlx::query_as::<_, Ride>("SELECT * FROM rides WHERE id = ?")
        .bind(ride_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))
}

/// Give a seat back; the guard keeps the counter from going negative
async fn release_seat(tx: &mut Transaction<'_, Sqlite>, ride_id: i64) -> Result<(), ApiError> {
    let released = sqlx::query(
        "UPDATE rides SET seats_filled = seats_filled - 1, updated_at = ? WHERE id = ? AND seats_filled > 0",
    )
    .bind(Utc::now().to_rfc3339())
    .bind(ride_id)
    .execute(&mut **tx)
    .await?;

    if released.rows_affected() == 0 {
        warn!(ride_id = ride_id, "Seat counter already at zero while releasing a seat");
    }
    Ok(())
}

impl ParticipantService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Exercise an approved request and take a seat.
    ///
    /// Every approved request the user holds is consumed, the participant row
    /// is created and the seat counter incremented, all in one transaction.
    /// The guarded increment runs first: it only applies while the ride still
    /// has room, and as a write it takes the database write lock before any
    /// check reads, so concurrent joins queue on the busy timeout instead of
    /// failing with a locked database. Any failed check rolls the claim back.
    pub async fn join_with_privilege(
        &self,
        ride_id: i64,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<Participant, ApiError> {
        let stamp = now.to_rfc3339();
        let mut tx = self.db.begin().await?;

        let claimed = sqlx::query(
            "UPDATE rides SET seats_filled = seats_filled + 1, updated_at = ? WHERE id = ? AND seats_filled < seats",
        )
        .bind(&stamp)
        .bind(ride_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let (privileged,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM join_requests WHERE ride_id = ? AND user_id = ? AND status = 'approved'",
        )
        .bind(ride_id)
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await?;

        if privileged == 0 {
            tx.rollback().await?;
            return Err(ApiError::Forbidden(
                "You don't have privilege to join this ride".to_string(),
            ));
        }

        if !claimed {
            // either the ride is gone or its last seat is taken
            ride_in_tx(&mut tx, ride_id).await?;
            tx.rollback().await?;
            warn!(ride_id = ride_id, user_id = user.id, "No seat left to claim, join rolled back");
            return Err(ApiError::Conflict(
                "Ride is full - no seats available".to_string(),
            ));
        }

        let (already_joined,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM participants WHERE ride_id = ? AND user_id = ?")
                .bind(ride_id)
                .bind(user.id)
                .fetch_one(&mut *tx)
                .await?;

        if already_joined > 0 {
            tx.rollback().await?;
            return Err(ApiError::Conflict(
                "You are already a participant in this ride".to_string(),
            ));
        }

        // one seat at a time: every other privilege lapses
        let consumed = sqlx::query(
            "DELETE FROM join_requests WHERE user_id = ? AND status = 'approved'",
        )
        .bind(user.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let inserted = sqlx::query(
            r#"
            INSERT INTO participants (ride_id, user_id, joined_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(ride_id)
        .bind(user.id)
        .bind(&stamp)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&mut *tx)
        .await;

        let participant_id = match inserted {
            Ok(result) => result.last_insert_rowid(),
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                return Err(ApiError::Conflict(
                    "You are already a participant in this ride".to_string(),
                ));
            }
            Err(e) => return Err(ApiError::DatabaseError(e)),
        };

        let participant = sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE id = ?")
            .bind(participant_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            ride_id = ride_id,
            user_id = user.id,
            participant_id = participant.id,
            privileges_consumed = consumed,
            "Joined ride"
        );

        Ok(participant)
    }

    /// Undo the caller's involvement with a ride: a pending request if there
    /// is one, otherwise their seat. Giving up a seat notifies the leader.
    pub async fn cancel_involvement(
        &self,
        ride_id: i64,
        user: &User,
    ) -> Result<CancelOutcome, ApiError> {
        if RequestService::new(self.db.clone())
            .delete_pending(ride_id, user.id)
            .await?
        {
            return Ok(CancelOutcome::RequestCancelled);
        }

        let mut tx = self.db.begin().await?;

        // the delete opens the transaction as a writer
        let participant = sqlx::query_as::<_, Participant>(
            "DELETE FROM participants WHERE ride_id = ? AND user_id = ? RETURNING *",
        )
        .bind(ride_id)
        .bind(user.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("You have no involvement with this ride".to_string()))?;

        let ride = ride_in_tx(&mut tx, ride_id).await?;
        release_seat(&mut tx, ride_id).await?;

        tx.commit().await?;

        info!(
            ride_id = ride_id,
            user_id = user.id,
            participant_id = participant.id,
            "Participation cancelled"
        );

        NotificationService::new(self.db.clone())
            .notify(NewNotification::participant_cancelled(&ride, &user.name))
            .await;

        Ok(CancelOutcome::ParticipationCancelled)
    }

    /// Leader drops a participant from their ride
    pub async fn remove_participant(
        &self,
        ride_id: i64,
        participant_id: i64,
        actor: &User,
    ) -> Result<(), ApiError> {
        let ride = RideService::new(self.db.clone())
            .get_led_ride(ride_id, actor)
            .await?;

        let mut tx = self.db.begin().await?;

        let participant = sqlx::query_as::<_, Participant>(
            "DELETE FROM participants WHERE id = ? AND ride_id = ? RETURNING *",
        )
        .bind(participant_id)
        .bind(ride_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Participant not found in this ride".to_string()))?;

        release_seat(&mut tx, ride_id).await?;

        tx.commit().await?;

        info!(
            ride_id = ride_id,
            participant_id = participant.id,
            removed_user_id = participant.user_id,
            "Participant removed by leader"
        );

        NotificationService::new(self.db.clone())
            .notify(NewNotification::participant_removed(participant.user_id, &ride))
            .await;

        Ok(())
    }

    /// Ride roster; phone numbers are shown to the leader only
    pub async fn list_participants(
        &self,
        ride_id: i64,
        viewer: &User,
    ) -> Result<Vec<ParticipantView>, ApiError> {
        let ride = RideService::new(self.db.clone()).get_ride(ride_id).await?;
        let show_phone = ride.is_led_by(viewer.id);

        let rows = sqlx::query_as::<_, RosterRow>(
            r#"
            SELECT p.id AS participant_id, u.name, u.gender, u.phone, p.joined_at
            FROM participants p
            JOIN users u ON u.id = p.user_id
            WHERE p.ride_id = ?
            ORDER BY p.joined_at ASC, p.id ASC
            "#,
        )
        .bind(ride_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ParticipantView::from_row(row, show_phone))
            .collect())
    }
}
