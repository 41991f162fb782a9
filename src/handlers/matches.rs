use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query_as, query_scalar, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::handlers::quiz::{quiz_detail, QuizDetail};
use crate::models::matches::{Match, MatchResult};
use crate::models::user::UserBrief;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatch {
    pub quiz_id: i32,
}

pub async fn create(user_info: UserInfo, Json(body): Json<CreateMatch>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    let hosted = query_as::<_, Match>("INSERT INTO matches (quiz_id, host_id) VALUES ($1, $2) RETURNING *")
        .bind(body.quiz_id)
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    Ok(HttpResponse::Created().json(hosted))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub record: Match,
    pub quiz: QuizDetail,
    pub host: UserBrief,
    pub match_results: Vec<MatchResult>,
}

async fn match_detail(db: &PgPool, id: i32) -> Result<MatchDetail, Error> {
    let mut conn = db.acquire().await?;
    let record: Match = query_as("SELECT * FROM matches WHERE id = $1").bind(id).fetch_one(&mut conn).await?;
    let host: UserBrief = query_as("SELECT id, username FROM users WHERE id = $1")
        .bind(record.host_id)
        .fetch_one(&mut conn)
        .await?;
    let match_results: Vec<MatchResult> = query_as("SELECT * FROM match_results WHERE match_id = $1 ORDER BY id")
        .bind(id)
        .fetch_all(&mut conn)
        .await?;
    drop(conn);
    let quiz = quiz_detail(db, record.quiz_id).await?;
    Ok(MatchDetail {
        record,
        quiz,
        host,
        match_results,
    })
}

pub async fn get_match(match_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<MatchDetail>, Error> {
    let detail = match_detail(&db, match_id.into_inner().0).await?;
    Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatch {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

pub async fn update_match(match_id: Path<(i32,)>, Json(body): Json<UpdateMatch>, db: Data<PgPool>) -> Result<Json<MatchDetail>, Error> {
    let match_id = match_id.into_inner().0;
    let mut conn = db.acquire().await?;
    query_scalar::<_, i32>("UPDATE matches SET start_time = COALESCE($2, start_time), end_time = COALESCE($3, end_time) WHERE id = $1 RETURNING id")
        .bind(match_id)
        .bind(body.start_time)
        .bind(body.end_time)
        .fetch_one(&mut conn)
        .await?;
    drop(conn);
    let detail = match_detail(&db, match_id).await?;
    Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct SubmitResult {
    pub score: i32,
}

pub async fn submit_result(
    user_info: UserInfo,
    match_id: Path<(i32,)>,
    Json(body): Json<SubmitResult>,
    db: Data<PgPool>,
) -> Result<HttpResponse, Error> {
    let match_id = match_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let exists: bool = query_scalar("SELECT EXISTS(SELECT id FROM matches WHERE id = $1)")
        .bind(match_id)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        return Err(Error::NotFound("match"));
    }
    let result = query_as::<_, MatchResult>("INSERT INTO match_results (match_id, user_id, score) VALUES ($1, $2, $3) RETURNING *")
        .bind(match_id)
        .bind(user_info.id)
        .bind(body.score)
        .fetch_one(&mut conn)
        .await?;
    Ok(HttpResponse::Created().json(result))
}
