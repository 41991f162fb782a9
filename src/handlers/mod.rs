pub mod category;
pub mod form;
pub mod matches;
pub mod question;
pub mod quiz;
pub mod rating;
pub mod user;

use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use chrono::Utc;
use hex::ToHex;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{query_as, PgPool};
use std::ops::Add;

use crate::error::Error;
use crate::middlewares::jwt::Claim;
use crate::models::user::{User, UserBrief};
use crate::tokener::{Tokener, JWT};

pub static JWT_SECRET: &str = "JWT_SECRET";

fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

fn random_salt() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect()
}

fn issue_token(user_id: i32) -> Result<String, Error> {
    let claim = Claim {
        user: user_id.to_string(),
        exp: Utc::now().add(chrono::Duration::days(1)).timestamp(),
    };
    let secret = dotenv::var(JWT_SECRET)?;
    let tokener = JWT::new(secret.into_bytes());
    tokener.gen_token(&claim)
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserBrief,
    pub token: String,
}

pub async fn register(Json(Credentials { username, password }): Json<Credentials>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    let salt = random_salt();
    let user = query_as::<_, User>("INSERT INTO users (username, password, salt) VALUES ($1, $2, $3) RETURNING *")
        .bind(&username)
        .bind(hash_password(&password, &salt))
        .bind(&salt)
        .fetch_one(&mut conn)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                Error::Business("username already taken".into())
            }
            _ => Error::from(e),
        })?;
    let token = issue_token(user.id)?;
    Ok(HttpResponse::build(StatusCode::CREATED).json(AuthResponse {
        user: user.into(),
        token,
    }))
}

pub async fn login(Json(Credentials { username, password }): Json<Credentials>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    if let Some(user) = query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&username)
        .fetch_optional(&mut conn)
        .await?
    {
        if hash_password(&password, &user.salt) == user.password {
            let token = issue_token(user.id)?;
            return Ok(HttpResponse::Ok().json(AuthResponse {
                user: user.into(),
                token,
            }));
        }
    }
    Err(Error::Unauthorized)
}
