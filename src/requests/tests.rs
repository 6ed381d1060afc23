//! Tests for the join-request state machine

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::super::cooldown::{cooldown_info, remaining_cooldown_minutes};
    use super::super::models::RequestStatus;
    use super::super::services::RequestService;
    use crate::common::test_utils::{seed_ride, seed_user, setup_test_db, t0};
    use crate::common::ApiError;
    use crate::notifications::NotificationService;
    use crate::participants::ParticipantService;

    #[test]
    fn test_cooldown_rounds_remaining_minutes_up() {
        let revoked = t0();
        assert_eq!(remaining_cooldown_minutes(revoked, revoked), Some(30));
        assert_eq!(
            remaining_cooldown_minutes(revoked, revoked + Duration::minutes(10)),
            Some(20)
        );
        assert_eq!(
            remaining_cooldown_minutes(revoked, revoked + Duration::seconds(10 * 60 + 1)),
            Some(20)
        );
        assert_eq!(
            remaining_cooldown_minutes(revoked, revoked + Duration::seconds(29 * 60 + 59)),
            Some(1)
        );
        assert_eq!(
            remaining_cooldown_minutes(revoked, revoked + Duration::minutes(30)),
            None
        );
        assert_eq!(
            remaining_cooldown_minutes(revoked, revoked + Duration::minutes(31)),
            None
        );
    }

    #[test]
    fn test_cooldown_info_treats_missing_stamp_as_elapsed() {
        let info = cooldown_info(None, t0());
        assert!(info.can_resend);
        assert_eq!(info.remaining_minutes, 0);

        let stamp = t0().to_rfc3339();
        let info = cooldown_info(Some(&stamp), t0() + Duration::minutes(5));
        assert!(!info.can_resend);
        assert_eq!(info.remaining_minutes, 25);
    }

    #[tokio::test]
    async fn test_submit_creates_pending_request() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;

        let request = RequestService::new(pool)
            .submit(ride.id, &rider, t0())
            .await
            .unwrap();

        assert_eq!(request.ride_id, ride.id);
        assert_eq!(request.user_id, rider.id);
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.revoked_at.is_none());
    }

    #[tokio::test]
    async fn test_submit_for_missing_ride_is_not_found() {
        let pool = setup_test_db().await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;

        let err = RequestService::new(pool)
            .submit(999, &rider, t0())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_active_requests_are_conflicts() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let service = RequestService::new(pool);

        let request = service.submit(ride.id, &rider, t0()).await.unwrap();
        match service.submit(ride.id, &rider, t0()).await.unwrap_err() {
            ApiError::Conflict(msg) => assert_eq!(msg, "Request already pending"),
            other => panic!("expected conflict, got {:?}", other),
        }

        service.approve(ride.id, request.id, &leader).await.unwrap();
        match service.submit(ride.id, &rider, t0()).await.unwrap_err() {
            ApiError::Conflict(msg) => assert_eq!(msg, "Already approved for this ride"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_leader_cannot_request_on_a_date_they_lead() {
        let pool = setup_test_db().await;
        let leader_a = seed_user(&pool, "uid-a", "Leader A").await;
        let leader_b = seed_user(&pool, "uid-b", "Leader B").await;
        let ride_a = seed_ride(&pool, &leader_a, "2025-06-15", 3).await;
        seed_ride(&pool, &leader_b, "2025-06-15", 3).await;

        match RequestService::new(pool)
            .submit(ride_a.id, &leader_b, t0())
            .await
            .unwrap_err()
        {
            ApiError::Conflict(msg) => assert!(msg.contains("2025-06-15"), "{}", msg),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reject_starts_cooldown_then_allows_resubmission() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let service = RequestService::new(pool.clone());

        let request = service
            .submit(ride.id, &rider, t0() - Duration::minutes(5))
            .await
            .unwrap();
        let rejected = service
            .reject(ride.id, request.id, &leader, t0())
            .await
            .unwrap();
        assert_eq!(rejected.status, RequestStatus::Revoked);
        assert!(rejected.revoked_at.is_some());

        match service
            .submit(ride.id, &rider, t0() + Duration::minutes(10))
            .await
            .unwrap_err()
        {
            ApiError::CooldownActive {
                message,
                remaining_minutes,
            } => {
                assert_eq!(remaining_minutes, 20);
                assert!(message.contains("20 more minutes"), "{}", message);
            }
            other => panic!("expected cooldown, got {:?}", other),
        }

        let fresh = service
            .submit(ride.id, &rider, t0() + Duration::minutes(31))
            .await
            .unwrap();
        assert_eq!(fresh.status, RequestStatus::Pending);
        assert_ne!(fresh.id, request.id);

        let (rows,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM join_requests WHERE ride_id = ? AND user_id = ?",
        )
        .bind(ride.id)
        .bind(rider.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_reject_sends_no_notification_but_approve_does() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let approved = seed_user(&pool, "uid-approved", "Approved").await;
        let rejected = seed_user(&pool, "uid-rejected", "Rejected").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let service = RequestService::new(pool.clone());

        let a = service.submit(ride.id, &approved, t0()).await.unwrap();
        let r = service.submit(ride.id, &rejected, t0()).await.unwrap();
        service.approve(ride.id, a.id, &leader).await.unwrap();
        service.reject(ride.id, r.id, &leader, t0()).await.unwrap();

        let notifications = NotificationService::new(pool);
        let listed = notifications.list_for_user(approved.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].ride_id, ride.id);
        assert_eq!(notifications.unread_count(rejected.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_leader_decides_and_only_pending_requests() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let service = RequestService::new(pool);

        let request = service.submit(ride.id, &rider, t0()).await.unwrap();

        let err = service.approve(ride.id, request.id, &rider).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err = service
            .approve(ride.id + 50, request.id, &leader)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        service.approve(ride.id, request.id, &leader).await.unwrap();
        let err = service
            .reject(ride.id, request.id, &leader, t0())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_pending_request() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let service = RequestService::new(pool);

        let err = service.cancel_pending(ride.id, &rider).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        service.submit(ride.id, &rider, t0()).await.unwrap();
        service.cancel_pending(ride.id, &rider).await.unwrap();
        assert!(service.list_for_ride(ride.id, &leader).await.unwrap().is_empty());

        // withdrawing carries no cooldown
        service.submit(ride.id, &rider, t0()).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_for_ride_is_leader_only() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let service = RequestService::new(pool);

        service.submit(ride.id, &rider, t0()).await.unwrap();

        let pending = service.list_for_ride(ride.id, &leader).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Rider");
        assert_eq!(pending[0].gender, "female");
        assert_eq!(pending[0].status, RequestStatus::Pending);

        let err = service.list_for_ride(ride.id, &rider).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_sent_listing_reports_actions_and_cooldown() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let pending_ride = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let approved_ride = seed_ride(&pool, &leader, "2025-06-16", 2).await;
        let revoked_ride = seed_ride(&pool, &leader, "2025-06-17", 2).await;
        let service = RequestService::new(pool);

        service.submit(pending_ride.id, &rider, t0()).await.unwrap();
        let a = service.submit(approved_ride.id, &rider, t0()).await.unwrap();
        service.approve(approved_ride.id, a.id, &leader).await.unwrap();
        let r = service.submit(revoked_ride.id, &rider, t0()).await.unwrap();
        service
            .reject(revoked_ride.id, r.id, &leader, t0())
            .await
            .unwrap();

        let sent = service
            .list_sent(rider.id, t0() + Duration::minutes(12))
            .await
            .unwrap();
        assert_eq!(sent.len(), 3);

        let by_ride = |id: i64| sent.iter().find(|s| s.ride_id == id).unwrap();

        let pending = by_ride(pending_ride.id);
        assert!(pending.can_cancel);
        assert!(!pending.can_join);
        assert!(pending.cooldown.is_none());
        assert_eq!(pending.leader_name, "Leader");

        let approved = by_ride(approved_ride.id);
        assert!(!approved.can_cancel);
        assert!(approved.can_join);
        assert_eq!(approved.seats_available, 2);

        let revoked = by_ride(revoked_ride.id);
        let cooldown = revoked.cooldown.as_ref().unwrap();
        assert!(!cooldown.can_resend);
        assert_eq!(cooldown.remaining_minutes, 18);
    }

    #[tokio::test]
    async fn test_privileges_list_approved_requests() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 2).await;
        let other = seed_ride(&pool, &leader, "2025-06-16", 2).await;
        let service = RequestService::new(pool);

        let a = service.submit(ride.id, &rider, t0()).await.unwrap();
        service.submit(other.id, &rider, t0()).await.unwrap();
        service.approve(ride.id, a.id, &leader).await.unwrap();

        let privileges = service.privileges(rider.id).await.unwrap();
        assert_eq!(privileges.len(), 1);
        assert_eq!(privileges[0].ride_id, ride.id);
        assert_eq!(privileges[0].request_id, a.id);
        assert_eq!(privileges[0].total_seats, 2);
        assert_eq!(privileges[0].seats_available, 2);
        assert!(privileges[0].can_join);
    }

    #[tokio::test]
    async fn test_clear_for_date_counts_each_category() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let other_leader = seed_user(&pool, "uid-other", "Other").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let morning = seed_ride(&pool, &leader, "2025-06-15", 3).await;
        let evening = seed_ride(&pool, &other_leader, "2025-06-15", 3).await;
        let next_day = seed_ride(&pool, &leader, "2025-06-16", 3).await;
        let service = RequestService::new(pool);

        service.submit(morning.id, &rider, t0()).await.unwrap();
        let e = service.submit(evening.id, &rider, t0()).await.unwrap();
        service.approve(evening.id, e.id, &other_leader).await.unwrap();
        service.submit(next_day.id, &rider, t0()).await.unwrap();

        let outcome = service.clear_for_date(rider.id, "2025-06-15").await.unwrap();
        assert_eq!(outcome.cancelled_requests, 1);
        assert_eq!(outcome.cancelled_privileges, 1);
        assert_eq!(outcome.total_cancelled, 2);
        assert_eq!(outcome.date, "2025-06-15");

        let remaining = service.list_sent(rider.id, t0()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].ride_id, next_day.id);

        let again = service.clear_for_date(rider.id, "2025-06-15").await.unwrap();
        assert_eq!(again.total_cancelled, 0);
        assert!(again.message.starts_with("No requests or privileges"));

        let err = service.clear_for_date(rider.id, "June 15").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_joining_consumes_the_privilege() {
        let pool = setup_test_db().await;
        let leader = seed_user(&pool, "uid-leader", "Leader").await;
        let rider = seed_user(&pool, "uid-rider", "Rider").await;
        let ride = seed_ride(&pool, &leader, "2025-06-15", 2).await;
        let service = RequestService::new(pool.clone());

        let request = service.submit(ride.id, &rider, t0()).await.unwrap();
        service.approve(ride.id, request.id, &leader).await.unwrap();
        ParticipantService::new(pool)
            .join_with_privilege(ride.id, &rider, t0())
            .await
            .unwrap();

        assert!(service.privileges(rider.id).await.unwrap().is_empty());
        let err = service.get_request(request.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
