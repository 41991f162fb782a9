use crate::error::Error;
use crate::models::question::{
    MediaInsert, MediaItem, OptionInsert, Question, QuestionDetails, QuestionInsert, QuestionKind, QuestionOption,
    QuestionPatch,
};
use crate::models::quiz::QuizBrief;
use crate::models::rating::{QuizRating, RatingInsert};

/// Storage operations the question aggregate is built on. Implemented by the
/// Postgres store and by an in-memory fake in tests.
pub trait QuestionStore {
    async fn insert_question(&mut self, data: QuestionInsert) -> Result<i32, Error>;
    /// Applies the provided fields to an existing row; absent fields keep
    /// their stored value. Missing id surfaces as a row-not-found failure.
    async fn patch_question(&mut self, id: i32, patch: QuestionPatch) -> Result<(), Error>;
    async fn get_question(&mut self, id: i32) -> Result<Question, Error>;
    async fn delete_question(&mut self, id: i32) -> Result<u64, Error>;

    async fn insert_detail(&mut self, question_id: i32, kind: &QuestionKind) -> Result<(), Error>;
    /// Insert-or-update keyed on the owning question. Detail rows of other
    /// kinds are left untouched.
    async fn upsert_detail(&mut self, question_id: i32, kind: &QuestionKind) -> Result<(), Error>;
    async fn load_details(&mut self, question_id: i32) -> Result<QuestionDetails, Error>;

    async fn insert_media(&mut self, question_id: i32, media: &[MediaInsert]) -> Result<(), Error>;
    async fn delete_media(&mut self, question_id: i32) -> Result<(), Error>;
    async fn list_media(&mut self, question_id: i32) -> Result<Vec<MediaItem>, Error>;

    async fn insert_options(&mut self, question_id: i32, options: &[OptionInsert]) -> Result<(), Error>;
    async fn delete_options(&mut self, question_id: i32) -> Result<(), Error>;
    async fn list_options(&mut self, question_id: i32) -> Result<Vec<QuestionOption>, Error>;

    async fn quiz_brief(&mut self, quiz_id: i32) -> Result<QuizBrief, Error>;
    async fn question_ids_by_quiz(&mut self, quiz_id: i32) -> Result<Vec<i32>, Error>;
}

pub trait RatingStore {
    async fn has_played(&mut self, user_id: i32, quiz_id: i32) -> Result<bool, Error>;
    async fn has_rated(&mut self, user_id: i32, quiz_id: i32) -> Result<bool, Error>;
    async fn insert_rating(&mut self, data: RatingInsert) -> Result<QuizRating, Error>;
}

pub trait Store: QuestionStore + RatingStore {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}
