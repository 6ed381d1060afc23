use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{CreateUserRequest, PublicProfile, UpdateUserRequest, User};
use super::validators::{non_blank, UserValidator};
use crate::common::{is_unique_violation, safe_email_log, ApiError, Validator};

/// User directory: maps external identities to internal user records
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Look up a user by the identity provider's subject
    pub async fn find_by_external_uid(&self, uid: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_uid = ?")
            .bind(uid)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// Look up a user by internal id
    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, user_id: i64) -> Result<User, ApiError> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Create the caller's profile on first sight.
    ///
    /// Returns the stored user and whether it was created by this call; an
    /// existing profile is returned untouched.
    pub async fn create_if_absent(
        &self,
        uid: &str,
        request: CreateUserRequest,
    ) -> Result<(User, bool), ApiError> {
        if let Some(existing) = self.find_by_external_uid(uid).await? {
            debug!(user_id = existing.id, "Profile already exists");
            return Ok((existing, false));
        }

        UserValidator.validate(&request).into_result()?;

        let now = Utc::now().to_rfc3339();
        let email = request.email.trim().to_lowercase();

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (external_uid, name, email, phone, gender, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uid)
        .bind(request.name.trim())
        .bind(&email)
        .bind(request.phone.trim())
        .bind(request.gender.as_deref().map(str::trim).unwrap_or(""))
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await;

        match inserted {
            Ok(result) => {
                let user = self.get_by_id(result.last_insert_rowid()).await?;
                info!(
                    user_id = user.id,
                    email = %safe_email_log(&user.email),
                    "User profile created"
                );
                Ok((user, true))
            }
            Err(e) if is_unique_violation(&e) => {
                // a concurrent call for the same identity may have won the insert
                if let Some(existing) = self.find_by_external_uid(uid).await? {
                    return Ok((existing, false));
                }
                Err(ApiError::Conflict("Email already registered".to_string()))
            }
            Err(e) => Err(ApiError::DatabaseError(e)),
        }
    }

    /// Update name, phone and gender; the external identity and email never change
    pub async fn update_profile(
        &self,
        user: &User,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        UserValidator.validate(&request).into_result()?;

        let name = non_blank(&request.name).map(str::trim).unwrap_or(&user.name);
        let phone = non_blank(&request.phone).map(str::trim).unwrap_or(&user.phone);
        let gender = non_blank(&request.gender)
            .map(str::trim)
            .unwrap_or(&user.gender);

        sqlx::query("UPDATE users SET name = ?, phone = ?, gender = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(phone)
            .bind(gender)
            .bind(Utc::now().to_rfc3339())
            .bind(user.id)
            .execute(&self.db)
            .await?;

        info!(user_id = user.id, "User profile updated");

        self.get_by_id(user.id).await
    }

    pub async fn public_profile(&self, user_id: i64) -> Result<PublicProfile, ApiError> {
        Ok(self.get_by_id(user_id).await?.into())
    }
}
