use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User database model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    #[serde(skip_serializing)]
    pub external_uid: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: Option<String>,
}

/// Partial profile update; absent or blank fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
}

/// What any authenticated caller may see about another user
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub name: String,
    pub gender: String,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            gender: user.gender,
        }
    }
}
