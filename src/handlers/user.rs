use actix_web::web::{Data, Json};
use serde::Serialize;
use sqlx::{query_scalar, PgPool};

use crate::context::UserInfo;
use crate::error::Error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub quizzes_created: i64,
    pub matches_hosted: i64,
    pub matches_played: i64,
    pub ratings_given: i64,
}

pub async fn statistics(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<UserStats>, Error> {
    let mut conn = db.acquire().await?;
    let quizzes_created = query_scalar("SELECT COUNT(*) FROM quizzes WHERE creator_id = $1")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    let matches_hosted = query_scalar("SELECT COUNT(*) FROM matches WHERE host_id = $1")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    let matches_played = query_scalar("SELECT COUNT(*) FROM match_results WHERE user_id = $1")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    let ratings_given = query_scalar("SELECT COUNT(*) FROM quiz_ratings WHERE user_id = $1")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    Ok(Json(UserStats {
        quizzes_created,
        matches_hosted,
        matches_played,
        ratings_given,
    }))
}
