use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("only image files are allowed for upload")]
    UnsupportedMedia,

    #[error("{0}")]
    Business(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("upload error: {0}")]
    Upload(#[from] reqwest::Error),

    #[error("jwt error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("multipart error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),

    #[error("malformed json field: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dotenv error: {0}")]
    DotEnv(#[from] dotenv::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl Error {
    // Internal failure detail goes to the log, not the response body.
    fn public_message(&self) -> String {
        match self {
            Error::Database(sqlx::Error::RowNotFound) => "not found".into(),
            Error::Database(_) => "database error".into(),
            Error::Upload(_) => "media upload failed".into(),
            Error::Token(_) => "invalid token".into(),
            Error::DotEnv(_) => "server misconfigured".into(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::Business(_) | Error::Json(_) | Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) | Error::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Error::UnsupportedMedia => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::Unauthorized | Error::Token(_) => StatusCode::UNAUTHORIZED,
            Error::Database(_) | Error::Upload(_) | Error::DotEnv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.public_message(),
        })
    }
}
