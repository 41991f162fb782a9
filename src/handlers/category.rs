use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use serde::Deserialize;
use sqlx::{query_as, PgPool};

use crate::error::Error;
use crate::models::category::Category;
use crate::models::quiz::{QuizRefRow, QuizWithRefs};

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

pub async fn create(Json(body): Json<CreateCategory>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    let category = query_as::<_, Category>("INSERT INTO quiz_categories (name) VALUES ($1) RETURNING *")
        .bind(&body.name)
        .fetch_one(&mut conn)
        .await?;
    Ok(HttpResponse::Created().json(category))
}

pub async fn list(db: Data<PgPool>) -> Result<Json<Vec<Category>>, Error> {
    let mut conn = db.acquire().await?;
    let categories = query_as("SELECT * FROM quiz_categories ORDER BY id").fetch_all(&mut conn).await?;
    Ok(Json(categories))
}

/// Public quizzes in a category, for the browse view.
pub async fn quizzes(category_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<Vec<QuizWithRefs>>, Error> {
    let mut conn = db.acquire().await?;
    let rows: Vec<QuizRefRow> = query_as(
        "SELECT q.*, u.username AS creator_username, c.name AS category_name \
         FROM quizzes AS q \
         JOIN users AS u ON q.creator_id = u.id \
         JOIN quiz_categories AS c ON q.category_id = c.id \
         WHERE q.category_id = $1 AND q.is_public ORDER BY q.id",
    )
    .bind(category_id.into_inner().0)
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
