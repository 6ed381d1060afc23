//! Tests for the notification ledger

#[cfg(test)]
mod tests {
    use super::super::models::{NewNotification, NotificationKind};
    use super::super::services::NotificationService;
    use crate::common::test_utils::{seed_ride, seed_user, setup_test_db};
    use crate::common::ApiError;

    #[tokio::test]
    async fn test_builders_address_the_right_user() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;

        let approved = NewNotification::request_approved(42, &ride);
        assert_eq!(approved.user_id, 42);
        assert_eq!(approved.kind, NotificationKind::RequestApproved);
        assert!(approved.message.contains("College Campus to City Airport on 2025-06-15 at 15:30"));

        let cancelled = NewNotification::participant_cancelled(&ride, "Rider");
        assert_eq!(cancelled.user_id, leader.id);
        assert!(cancelled.message.starts_with("Rider has cancelled"));

        let ride_gone = NewNotification::ride_cancelled(7, &ride, "Leader");
        assert_eq!(ride_gone.kind, NotificationKind::RideCancelled);
        assert!(ride_gone.message.ends_with("by the leader Leader"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_ride_context() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let first = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let second = seed_ride(&pool, &leader, "2025-06-16", 3).await;
        let service = NotificationService::new(pool);

        let older = service
            .create(NewNotification::request_approved(rider.id, &first))
            .await
            .unwrap();
        let newer = service
            .create(NewNotification::participant_removed(rider.id, &second))
            .await
            .unwrap();
        assert!(!older.is_read);

        let listed = service.list_for_user(rider.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[0].date, "2025-06-16");
        assert_eq!(listed[1].id, older.id);
        assert_eq!(listed[1].origin, "College Campus");

        assert!(service.list_for_user(leader.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notices_for_deleted_rides_are_skipped() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let kept = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let gone = seed_ride(&pool, &leader, "2025-06-16", 3).await;
        let service = NotificationService::new(pool.clone());

        service
            .create(NewNotification::request_approved(rider.id, &kept))
            .await
            .unwrap();
        sqlx::query("DELETE FROM rides WHERE id = ?")
            .bind(gone.id)
            .execute(&pool)
            .await
            .unwrap();
        service
            .create(NewNotification::ride_cancelled(rider.id, &gone, "Leader"))
            .await
            .unwrap();

        let listed = service.list_for_user(rider.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].ride_id, kept.id);
    }

    #[tokio::test]
    async fn test_unread_count_matches_listing_after_ride_deletion() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let kept = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let gone = seed_ride(&pool, &leader, "2025-06-16", 3).await;
        let service = NotificationService::new(pool.clone());

        service
            .create(NewNotification::request_approved(rider.id, &kept))
            .await
            .unwrap();
        service
            .create(NewNotification::request_approved(rider.id, &gone))
            .await
            .unwrap();
        assert_eq!(service.unread_count(rider.id).await.unwrap(), 2);

        sqlx::query("DELETE FROM rides WHERE id = ?")
            .bind(gone.id)
            .execute(&pool)
            .await
            .unwrap();

        let unread = service
            .list_for_user(rider.id)
            .await
            .unwrap()
            .iter()
            .filter(|n| !n.is_read)
            .count() as i64;
        assert_eq!(unread, 1);
        assert_eq!(service.unread_count(rider.id).await.unwrap(), unread);
    }

    #[tokio::test]
    async fn test_mark_read_is_owner_only() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let service = NotificationService::new(pool);

        let notice = service
            .create(NewNotification::request_approved(rider.id, &ride))
            .await
            .unwrap();
        assert_eq!(service.unread_count(rider.id).await.unwrap(), 1);

        let err = service.mark_read(notice.id, leader.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(service.unread_count(rider.id).await.unwrap(), 1);

        service.mark_read(notice.id, rider.id).await.unwrap();
        assert_eq!(service.unread_count(rider.id).await.unwrap(), 0);
        assert!(service.list_for_user(rider.id).await.unwrap()[0].is_read);
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let service = NotificationService::new(pool);

        assert!(service.notify(NewNotification::request_approved(leader.id, &ride)).await);
        // unknown recipient violates the users foreign key
        assert!(!service.notify(NewNotification::request_approved(9999, &ride)).await);
        assert_eq!(service.unread_count(9999).await.unwrap(), 0);
    }
}
