use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuizRating {
    pub id: i32,
    pub quiz_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RatingInsert {
    pub quiz_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub text: Option<String>,
}

/// One quiz's ratings rolled up for display.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    pub id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub text: Option<String>,
}
