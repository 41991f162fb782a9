use actix_multipart::Multipart;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use sqlx::PgPool;

use crate::context::UserInfo;
use crate::database::sqlx::PgStore;
use crate::db::{QuestionStore, TxStore};
use crate::error::Error;
use crate::handlers::form::read_form;
use crate::models::question::{QuestionPayload, QuestionType, QuestionUpdatePayload};
use crate::response::DeleteResponse;
use crate::services::media::collect_media;
use crate::services::question::{create_question, load_question, update_question};
use crate::uploader::MediaUploader;

async fn create_typed<U>(type_: QuestionType, mut payload: Multipart, db: Data<PgPool>, uploader: Data<U>) -> Result<HttpResponse, Error>
where
    U: MediaUploader,
{
    let mut form = read_form(&mut payload).await?;
    let media = collect_media(uploader.get_ref(), form.take_files(), form.videos()?).await?;
    let question = QuestionPayload {
        quiz_id: form.int("quizId")?,
        text: form.require("text")?,
        type_,
        fields: form.kind_fields()?,
        media,
        options: form.options()?,
    };
    let mut store = PgStore::new(db.begin().await?);
    let aggregate = create_question(&mut store, question).await?;
    store.commit().await?;
    Ok(HttpResponse::Created().json(aggregate))
}

async fn update_typed<U>(
    type_: QuestionType,
    id: i32,
    mut payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error>
where
    U: MediaUploader,
{
    let mut form = read_form(&mut payload).await?;
    let media = collect_media(uploader.get_ref(), form.take_files(), form.videos()?).await?;
    let update = QuestionUpdatePayload {
        text: form.text("text"),
        type_: Some(type_),
        fields: form.kind_fields()?,
        media,
        options: form.options()?,
    };
    let mut store = PgStore::new(db.begin().await?);
    let aggregate = update_question(&mut store, id, update).await?;
    store.commit().await?;
    Ok(HttpResponse::Ok().json(aggregate))
}

pub async fn create_buttons<U: MediaUploader>(
    _user_info: UserInfo,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    create_typed(QuestionType::Buttons, payload, db, uploader).await
}

pub async fn update_buttons<U: MediaUploader>(
    _user_info: UserInfo,
    question_id: Path<(i32,)>,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    update_typed(QuestionType::Buttons, question_id.into_inner().0, payload, db, uploader).await
}

pub async fn create_checkboxes<U: MediaUploader>(
    _user_info: UserInfo,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    create_typed(QuestionType::Checkboxes, payload, db, uploader).await
}

pub async fn update_checkboxes<U: MediaUploader>(
    _user_info: UserInfo,
    question_id: Path<(i32,)>,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    update_typed(QuestionType::Checkboxes, question_id.into_inner().0, payload, db, uploader).await
}

pub async fn create_range<U: MediaUploader>(
    _user_info: UserInfo,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    create_typed(QuestionType::Range, payload, db, uploader).await
}

pub async fn update_range<U: MediaUploader>(
    _user_info: UserInfo,
    question_id: Path<(i32,)>,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    update_typed(QuestionType::Range, question_id.into_inner().0, payload, db, uploader).await
}

pub async fn create_reorder<U: MediaUploader>(
    _user_info: UserInfo,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    create_typed(QuestionType::Reorder, payload, db, uploader).await
}

pub async fn update_reorder<U: MediaUploader>(
    _user_info: UserInfo,
    question_id: Path<(i32,)>,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    update_typed(QuestionType::Reorder, question_id.into_inner().0, payload, db, uploader).await
}

pub async fn create_location<U: MediaUploader>(
    _user_info: UserInfo,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    create_typed(QuestionType::Location, payload, db, uploader).await
}

pub async fn update_location<U: MediaUploader>(
    _user_info: UserInfo,
    question_id: Path<(i32,)>,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    update_typed(QuestionType::Location, question_id.into_inner().0, payload, db, uploader).await
}

pub async fn create_type_answer<U: MediaUploader>(
    _user_info: UserInfo,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    create_typed(QuestionType::TypeAnswer, payload, db, uploader).await
}

pub async fn update_type_answer<U: MediaUploader>(
    _user_info: UserInfo,
    question_id: Path<(i32,)>,
    payload: Multipart,
    db: Data<PgPool>,
    uploader: Data<U>,
) -> Result<HttpResponse, Error> {
    update_typed(QuestionType::TypeAnswer, question_id.into_inner().0, payload, db, uploader).await
}

pub async fn retrieve(question_id: Path<(i32,)>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut store = PgStore::new(db.acquire().await?);
    let mut aggregate = load_question(&mut store, question_id.into_inner().0).await?;
    aggregate.quiz = Some(store.quiz_brief(aggregate.quiz_id).await?);
    Ok(HttpResponse::Ok().json(aggregate))
}

pub async fn remove(_user_info: UserInfo, question_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let mut store = PgStore::new(db.acquire().await?);
    let deleted = store.delete_question(question_id.into_inner().0).await?;
    if deleted == 0 {
        return Err(Error::NotFound("question"));
    }
    Ok(Json(DeleteResponse::new(deleted)))
}
