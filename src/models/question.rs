use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::quiz::QuizBrief;

#[derive(sqlx::Type)]
#[sqlx(type_name = "question_type")]
#[sqlx(rename_all = "UPPERCASE")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionType {
    Buttons,
    Checkboxes,
    Range,
    Reorder,
    Location,
    TypeAnswer,
}

#[derive(sqlx::Type)]
#[sqlx(type_name = "media_type")]
#[sqlx(rename_all = "UPPERCASE")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    pub quiz_id: i32,
    pub text: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_: QuestionType,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ButtonDetail {
    pub id: i32,
    pub question_id: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxDetail {
    pub id: i32,
    pub question_id: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReorderDetail {
    pub id: i32,
    pub question_id: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RangeDetail {
    pub id: i32,
    pub question_id: i32,
    pub min_value: f64,
    pub max_value: f64,
    pub correct_value: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TypeAnswerDetail {
    pub id: i32,
    pub question_id: i32,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub id: i32,
    pub question_id: i32,
    pub correct_latitude: f64,
    pub correct_longitude: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: i32,
    pub question_id: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_: MediaType,
    pub url: String,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: i32,
    pub question_id: i32,
    pub text: String,
    pub is_correct: bool,
    #[serde(rename = "order")]
    pub ord: Option<i32>,
}

/// The type-specific half of a question, one variant per question kind.
/// Writes dispatch on this exhaustively, so a question can never be stored
/// with a detail row that contradicts its type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Buttons,
    Checkboxes,
    Reorder,
    Range {
        min_value: f64,
        max_value: f64,
        correct_value: f64,
    },
    TypeAnswer {
        correct_answer: String,
    },
    Location {
        correct_latitude: f64,
        correct_longitude: f64,
    },
}

impl QuestionKind {
    pub fn type_tag(&self) -> QuestionType {
        match self {
            QuestionKind::Buttons => QuestionType::Buttons,
            QuestionKind::Checkboxes => QuestionType::Checkboxes,
            QuestionKind::Reorder => QuestionType::Reorder,
            QuestionKind::Range { .. } => QuestionType::Range,
            QuestionKind::TypeAnswer { .. } => QuestionType::TypeAnswer,
            QuestionKind::Location { .. } => QuestionType::Location,
        }
    }
}

/// Detail rows as they exist in storage. Loaded for responses; after a type
/// change more than one slot can be populated because the previous kind's
/// row is not cleaned up.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetails {
    pub button: Option<ButtonDetail>,
    pub checkbox: Option<CheckboxDetail>,
    pub reorder: Option<ReorderDetail>,
    pub range: Option<RangeDetail>,
    pub type_answer: Option<TypeAnswerDetail>,
    pub location: Option<LocationDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAggregate {
    pub id: i32,
    pub quiz_id: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub type_: QuestionType,
    #[serde(flatten)]
    pub details: QuestionDetails,
    pub media: Vec<MediaItem>,
    pub options: Vec<QuestionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizBrief>,
}

#[derive(Debug, Clone)]
pub struct QuestionInsert {
    pub quiz_id: i32,
    pub text: String,
    pub type_: QuestionType,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
    pub text: Option<String>,
    pub type_: Option<QuestionType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaInsert {
    pub type_: MediaType,
    pub url: String,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionInsert {
    pub text: String,
    pub is_correct: bool,
    pub ord: Option<i32>,
}

/// Fields that only some question kinds carry, as they arrive in a request.
#[derive(Debug, Clone, Default)]
pub struct KindFields {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub correct_value: Option<f64>,
    pub correct_answer: Option<String>,
    pub correct_latitude: Option<f64>,
    pub correct_longitude: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct QuestionPayload {
    pub quiz_id: i32,
    pub text: String,
    pub type_: QuestionType,
    pub fields: KindFields,
    pub media: Vec<MediaInsert>,
    pub options: Vec<OptionInsert>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionUpdatePayload {
    pub text: Option<String>,
    pub type_: Option<QuestionType>,
    pub fields: KindFields,
    pub media: Vec<MediaInsert>,
    pub options: Vec<OptionInsert>,
}

/// `options` as posted by clients, a JSON array inside a multipart field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionInput {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    pub order: Option<i32>,
}

impl From<OptionInput> for OptionInsert {
    fn from(input: OptionInput) -> Self {
        OptionInsert {
            text: input.text,
            is_correct: input.is_correct,
            ord: input.order,
        }
    }
}

/// `videos` as posted by clients; the URL is external, never uploaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInput {
    pub url: String,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
}
