//! Tests for the user directory

#[cfg(test)]
mod tests {
    use super::super::models::{CreateUserRequest, UpdateUserRequest};
    use super::super::services::UserService;
    use super::super::validators::UserValidator;
    use crate::common::test_utils::{seed_user, setup_test_db};
    use crate::common::{ApiError, Validator};

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Asha Verma".to_string(),
            email: email.to_string(),
            phone: "+91 98765-43210".to_string(),
            gender: Some("female".to_string()),
        }
    }

    #[test]
    fn test_create_validation_accepts_valid_profile() {
        let result = UserValidator.validate(&request("asha@campus.edu"));
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_create_validation_rejects_bad_fields() {
        let bad = CreateUserRequest {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            phone: "call me".to_string(),
            gender: Some("x".repeat(11)),
        };
        let result = UserValidator.validate(&bad);
        assert!(!result.is_valid);
        for field in ["name", "email", "phone", "gender"] {
            assert!(
                result.errors.iter().any(|e| e.field == field),
                "expected error on {}",
                field
            );
        }
    }

    #[tokio::test]
    async fn test_create_if_absent_is_idempotent_per_identity() {
        let pool = setup_test_db().await;
        let service = UserService::new(pool);

        let (first, created) = service
            .create_if_absent("uid-asha", request("Asha@Campus.edu"))
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.email, "asha@campus.edu");
        assert_eq!(first.external_uid, "uid-asha");

        let (second, created_again) = service
            .create_if_absent("uid-asha", request("other@campus.edu"))
            .await
            .unwrap();
        assert!(!created_again);
        assert_eq!(second.id, first.id);
        assert_eq!(second.email, "asha@campus.edu");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let pool = setup_test_db().await;
        let service = UserService::new(pool);

        service
            .create_if_absent("uid-1", request("same@campus.edu"))
            .await
            .unwrap();
        let err = service
            .create_if_absent("uid-2", request("same@campus.edu"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_lookups_by_identity_and_by_id() {
        let pool = setup_test_db().await;
        let user = seed_user(&pool, "uid-ravi", "Ravi").await;
        let service = UserService::new(pool);

        let by_uid = service.find_by_external_uid("uid-ravi").await.unwrap().unwrap();
        let by_id = service.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_uid.id, by_id.id);

        assert!(service.find_by_external_uid("nobody").await.unwrap().is_none());
        assert!(matches!(
            service.get_by_id(9999).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_blank_fields() {
        let pool = setup_test_db().await;
        let user = seed_user(&pool, "uid-meera", "Meera").await;
        let service = UserService::new(pool);

        let updated = service
            .update_profile(
                &user,
                UpdateUserRequest {
                    name: Some("Meera K".to_string()),
                    phone: Some("   ".to_string()),
                    gender: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Meera K");
        assert_eq!(updated.phone, user.phone);
        assert_eq!(updated.gender, user.gender);
        assert_eq!(updated.external_uid, user.external_uid);
    }

    #[tokio::test]
    async fn test_public_profile_hides_contact_details() {
        let pool = setup_test_db().await;
        let user = seed_user(&pool, "uid-kiran", "Kiran").await;
        let profile = UserService::new(pool).public_profile(user.id).await.unwrap();

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Kiran");
        assert!(json.get("phone").is_none());
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_external_uid_never_serialized() {
        let user = super::super::models::User {
            id: 1,
            external_uid: "secret-uid".to_string(),
            name: "N".to_string(),
            email: "n@campus.edu".to_string(),
            phone: "1234567890".to_string(),
            gender: String::new(),
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            updated_at: "2025-01-01T00:00:00+00:00".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-uid"));
    }
}
