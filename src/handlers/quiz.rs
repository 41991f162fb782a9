use actix_multipart::Multipart;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use serde::Serialize;
use sqlx::{query_as, query_scalar, PgPool};

use crate::context::UserInfo;
use crate::database::sqlx::PgStore;
use crate::db::QuestionStore;
use crate::error::Error;
use crate::handlers::form::read_form;
use crate::models::category::Category;
use crate::models::question::QuestionAggregate;
use crate::models::quiz::{Quiz, QuizRefRow, QuizWithRefs};
use crate::models::rating::RatingEntry;
use crate::models::user::UserBrief;
use crate::services::question::load_question;
use crate::uploader::MediaUploader;

const QUIZ_WITH_REFS: &str = "SELECT q.*, u.username AS creator_username, c.name AS category_name \
                              FROM quizzes AS q \
                              JOIN users AS u ON q.creator_id = u.id \
                              JOIN quiz_categories AS c ON q.category_id = c.id";

pub async fn create<U>(user_info: UserInfo, mut payload: Multipart, db: Data<PgPool>, uploader: Data<U>) -> Result<HttpResponse, Error>
where
    U: MediaUploader,
{
    let mut form = read_form(&mut payload).await?;
    let mut image_url = None;
    for file in form.take_files() {
        if file.content_type.type_() != mime::IMAGE {
            return Err(Error::UnsupportedMedia);
        }
        image_url = Some(uploader.upload_image(&file.filename, file.content).await?);
    }
    let mut conn = db.acquire().await?;
    let quiz = query_as::<_, Quiz>(
        "INSERT INTO quizzes (title, description, image, is_public, creator_id, category_id) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(form.require("title")?)
    .bind(form.require("description")?)
    .bind(&image_url)
    .bind(form.bool_or("isPublic", false)?)
    .bind(user_info.id)
    .bind(form.int("categoryId")?)
    .fetch_one(&mut conn)
    .await?;
    let creator = query_as::<_, UserBrief>("SELECT id, username FROM users WHERE id = $1")
        .bind(quiz.creator_id)
        .fetch_one(&mut conn)
        .await?;
    let category = query_as::<_, Category>("SELECT id, name FROM quiz_categories WHERE id = $1")
        .bind(quiz.category_id)
        .fetch_one(&mut conn)
        .await?;
    Ok(HttpResponse::Created().json(QuizWithRefs {
        id: quiz.id,
        title: quiz.title,
        description: quiz.description,
        image: quiz.image,
        is_public: quiz.is_public,
        creator_id: quiz.creator_id,
        category_id: quiz.category_id,
        created_at: quiz.created_at,
        creator,
        category,
    }))
}

pub async fn list(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<Vec<QuizWithRefs>>, Error> {
    let mut conn = db.acquire().await?;
    let rows: Vec<QuizRefRow> = query_as(&format!("{} WHERE q.creator_id = $1 ORDER BY q.id", QUIZ_WITH_REFS))
        .bind(user_info.id)
        .fetch_all(&mut conn)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Serialize)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: QuizWithRefs,
    pub questions: Vec<QuestionAggregate>,
}

pub(crate) async fn quiz_detail(db: &PgPool, quiz_id: i32) -> Result<QuizDetail, Error> {
    let mut conn = db.acquire().await?;
    let row: QuizRefRow = query_as(&format!("{} WHERE q.id = $1", QUIZ_WITH_REFS))
        .bind(quiz_id)
        .fetch_one(&mut conn)
        .await?;
    let mut store = PgStore::new(conn);
    let ids = store.question_ids_by_quiz(quiz_id).await?;
    let mut questions = Vec::with_capacity(ids.len());
    for id in ids {
        questions.push(load_question(&mut store, id).await?);
    }
    Ok(QuizDetail {
        quiz: row.into(),
        questions,
    })
}

pub async fn retrieve(quiz_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<QuizDetail>, Error> {
    let detail = quiz_detail(&db, quiz_id.into_inner().0).await?;
    Ok(Json(detail))
}

pub async fn questions(quiz_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<Vec<QuestionAggregate>>, Error> {
    let quiz_id = quiz_id.into_inner().0;
    let mut store = PgStore::new(db.acquire().await?);
    let ids = store.question_ids_by_quiz(quiz_id).await?;
    let mut questions = Vec::with_capacity(ids.len());
    for id in ids {
        questions.push(load_question(&mut store, id).await?);
    }
    Ok(Json(questions))
}

#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
    pub ratings: Vec<RatingEntry>,
}

pub async fn ratings(quiz_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<RatingSummary>, Error> {
    let mut conn = db.acquire().await?;
    let entries: Vec<RatingEntry> = query_as("SELECT id, user_id, rating, text FROM quiz_ratings WHERE quiz_id = $1 ORDER BY id")
        .bind(quiz_id.into_inner().0)
        .fetch_all(&mut conn)
        .await?;
    let count = entries.len();
    let average = if count > 0 {
        entries.iter().map(|entry| f64::from(entry.rating)).sum::<f64>() / count as f64
    } else {
        0.0
    };
    Ok(Json(RatingSummary {
        average,
        count,
        ratings: entries,
    }))
}

#[derive(Debug, Serialize)]
pub struct RatedResponse {
    pub rated: bool,
}

pub async fn rated(user_info: UserInfo, quiz_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<RatedResponse>, Error> {
    let mut conn = db.acquire().await?;
    let rated = query_scalar("SELECT EXISTS(SELECT id FROM quiz_ratings WHERE user_id = $1 AND quiz_id = $2)")
        .bind(user_info.id)
        .bind(quiz_id.into_inner().0)
        .fetch_one(&mut conn)
        .await?;
    Ok(Json(RatedResponse { rated }))
}
