use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{NewNotification, Notification, NotificationView};
use crate::common::ApiError;

/// Append-only notification ledger
pub struct NotificationService {
    db: SqlitePool,
}

impl NotificationService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Append a notification
    pub async fn create(&self, new: NewNotification) -> Result<Notification, ApiError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, title, message, type, ride_id, is_read, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.kind)
        .bind(new.ride_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?;

        let notification =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = ?")
                .bind(result.last_insert_rowid())
                .fetch_one(&self.db)
                .await?;

        info!(
            notification_id = notification.id,
            user_id = new.user_id,
            ride_id = new.ride_id,
            kind = ?new.kind,
            "Notification created"
        );

        Ok(notification)
    }

    /// Best-effort append: failures are logged and reported as `false`
    pub async fn notify(&self, new: NewNotification) -> bool {
        let user_id = new.user_id;
        let ride_id = new.ride_id;
        match self.create(new).await {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    error = %e,
                    user_id = user_id,
                    ride_id = ride_id,
                    "Failed to create notification"
                );
                false
            }
        }
    }

    /// Newest first; entries whose ride no longer exists are left out
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<NotificationView>, ApiError> {
        let notifications = sqlx::query_as::<_, NotificationView>(
            r#"
            SELECT n.id, n.title, n.message, n.type, n.ride_id,
                   r.origin, r.destination, r.date, r.time,
                   n.is_read, n.created_at
            FROM notifications n
            JOIN rides r ON r.id = n.ride_id
            WHERE n.user_id = ?
            ORDER BY n.created_at DESC, n.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(notifications)
    }

    /// Mark a notification read; only its recipient may do so
    pub async fn mark_read(&self, notification_id: i64, user_id: i64) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Notification not found".to_string()));
        }

        info!(
            notification_id = notification_id,
            user_id = user_id,
            "Notification marked as read"
        );

        Ok(())
    }

    /// Counts only what `list_for_user` can show; notices of deleted rides are left out
    pub async fn unread_count(&self, user_id: i64) -> Result<i64, ApiError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM notifications n
            JOIN rides r ON r.id = n.ride_id
            WHERE n.user_id = ? AND n.is_read = 0
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }
}
