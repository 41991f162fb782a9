use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::category::Category;
use crate::models::user::UserBrief;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub is_public: bool,
    pub creator_id: i32,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuizBrief {
    pub id: i32,
    pub title: String,
}

/// Quiz joined with its creator and category names, one row per quiz.
#[derive(Debug, Clone, FromRow)]
pub struct QuizRefRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub is_public: bool,
    pub creator_id: i32,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub creator_username: String,
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizWithRefs {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub is_public: bool,
    pub creator_id: i32,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub creator: UserBrief,
    pub category: Category,
}

impl From<QuizRefRow> for QuizWithRefs {
    fn from(row: QuizRefRow) -> Self {
        QuizWithRefs {
            id: row.id,
            title: row.title,
            description: row.description,
            image: row.image,
            is_public: row.is_public,
            creator_id: row.creator_id,
            category_id: row.category_id,
            created_at: row.created_at,
            creator: UserBrief {
                id: row.creator_id,
                username: row.creator_username,
            },
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
        }
    }
}
