use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use serde::Deserialize;
use sqlx::PgPool;

use crate::context::UserInfo;
use crate::database::sqlx::PgStore;
use crate::error::Error;
use crate::services::rating::post_rating;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRating {
    pub quiz_id: i32,
    pub rating: i32,
    pub text: Option<String>,
}

pub async fn create(user_info: UserInfo, Json(body): Json<PostRating>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut store = PgStore::new(db.acquire().await?);
    let rating = post_rating(&mut store, user_info.id, body.quiz_id, body.rating, body.text).await?;
    Ok(HttpResponse::Created().json(rating))
}
