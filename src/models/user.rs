use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

/// The shape users are exposed as; credentials never leave the database layer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserBrief {
    pub id: i32,
    pub username: String,
}

impl From<User> for UserBrief {
    fn from(user: User) -> Self {
        UserBrief {
            id: user.id,
            username: user.username,
        }
    }
}
