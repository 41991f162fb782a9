use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, Postgres, Transaction};

use crate::db::{QuestionStore, RatingStore, Store, TxStore};
use crate::error::Error;
use crate::models::question::{
    ButtonDetail, CheckboxDetail, LocationDetail, MediaInsert, MediaItem, OptionInsert, Question, QuestionDetails,
    QuestionInsert, QuestionKind, QuestionOption, QuestionPatch, RangeDetail, ReorderDetail, TypeAnswerDetail,
};
use crate::models::quiz::QuizBrief;
use crate::models::rating::{QuizRating, RatingInsert};

pub struct PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    executor: E,
}

impl<E> PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> QuestionStore for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert_question(&mut self, data: QuestionInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO questions (quiz_id, text, type) VALUES ($1, $2, $3) RETURNING id")
            .bind(data.quiz_id)
            .bind(data.text)
            .bind(data.type_)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn patch_question(&mut self, id: i32, patch: QuestionPatch) -> Result<(), Error> {
        query_scalar::<_, i32>("UPDATE questions SET text = COALESCE($2, text), type = COALESCE($3, type) WHERE id = $1 RETURNING id")
            .bind(id)
            .bind(patch.text)
            .bind(patch.type_)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn get_question(&mut self, id: i32) -> Result<Question, Error> {
        let question = query_as("SELECT id, quiz_id, text, type FROM questions WHERE id = $1")
            .bind(id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(question)
    }

    async fn delete_question(&mut self, id: i32) -> Result<u64, Error> {
        let result = query("DELETE FROM questions WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(result.rows_affected())
    }

    async fn insert_detail(&mut self, question_id: i32, kind: &QuestionKind) -> Result<(), Error> {
        match kind {
            QuestionKind::Buttons => {
                query("INSERT INTO button_details (question_id) VALUES ($1)")
                    .bind(question_id)
                    .execute(&mut self.executor)
                    .await?;
            }
            QuestionKind::Checkboxes => {
                query("INSERT INTO checkbox_details (question_id) VALUES ($1)")
                    .bind(question_id)
                    .execute(&mut self.executor)
                    .await?;
            }
            QuestionKind::Reorder => {
                query("INSERT INTO reorder_details (question_id) VALUES ($1)")
                    .bind(question_id)
                    .execute(&mut self.executor)
                    .await?;
            }
            QuestionKind::Range {
                min_value,
                max_value,
                correct_value,
            } => {
                query("INSERT INTO range_details (question_id, min_value, max_value, correct_value) VALUES ($1, $2, $3, $4)")
                    .bind(question_id)
                    .bind(min_value)
                    .bind(max_value)
                    .bind(correct_value)
                    .execute(&mut self.executor)
                    .await?;
            }
            QuestionKind::TypeAnswer { correct_answer } => {
                query("INSERT INTO type_answer_details (question_id, correct_answer) VALUES ($1, $2)")
                    .bind(question_id)
                    .bind(correct_answer)
                    .execute(&mut self.executor)
                    .await?;
            }
            QuestionKind::Location {
                correct_latitude,
                correct_longitude,
            } => {
                query("INSERT INTO location_details (question_id, correct_latitude, correct_longitude) VALUES ($1, $2, $3)")
                    .bind(question_id)
                    .bind(correct_latitude)
                    .bind(correct_longitude)
                    .execute(&mut self.executor)
                    .await?;
            }
        }
        Ok(())
    }

    async fn upsert_detail(&mut self, question_id: i32, kind: &QuestionKind) -> Result<(), Error> {
        match kind {
            QuestionKind::Buttons => {
                query("INSERT INTO button_details (question_id) VALUES ($1) ON CONFLICT (question_id) DO NOTHING")
                    .bind(question_id)
                    .execute(&mut self.executor)
                    .await?;
            }
            QuestionKind::Checkboxes => {
                query("INSERT INTO checkbox_details (question_id) VALUES ($1) ON CONFLICT (question_id) DO NOTHING")
                    .bind(question_id)
                    .execute(&mut self.executor)
                    .await?;
            }
            QuestionKind::Reorder => {
                query("INSERT INTO reorder_details (question_id) VALUES ($1) ON CONFLICT (question_id) DO NOTHING")
                    .bind(question_id)
                    .execute(&mut self.executor)
                    .await?;
            }
            QuestionKind::Range {
                min_value,
                max_value,
                correct_value,
            } => {
                query(
                    "INSERT INTO range_details (question_id, min_value, max_value, correct_value) VALUES ($1, $2, $3, $4) \
                     ON CONFLICT (question_id) DO UPDATE SET min_value = EXCLUDED.min_value, max_value = EXCLUDED.max_value, correct_value = EXCLUDED.correct_value",
                )
                .bind(question_id)
                .bind(min_value)
                .bind(max_value)
                .bind(correct_value)
                .execute(&mut self.executor)
                .await?;
            }
            QuestionKind::TypeAnswer { correct_answer } => {
                query(
                    "INSERT INTO type_answer_details (question_id, correct_answer) VALUES ($1, $2) \
                     ON CONFLICT (question_id) DO UPDATE SET correct_answer = EXCLUDED.correct_answer",
                )
                .bind(question_id)
                .bind(correct_answer)
                .execute(&mut self.executor)
                .await?;
            }
            QuestionKind::Location {
                correct_latitude,
                correct_longitude,
            } => {
                query(
                    "INSERT INTO location_details (question_id, correct_latitude, correct_longitude) VALUES ($1, $2, $3) \
                     ON CONFLICT (question_id) DO UPDATE SET correct_latitude = EXCLUDED.correct_latitude, correct_longitude = EXCLUDED.correct_longitude",
                )
                .bind(question_id)
                .bind(correct_latitude)
                .bind(correct_longitude)
                .execute(&mut self.executor)
                .await?;
            }
        }
        Ok(())
    }

    async fn load_details(&mut self, question_id: i32) -> Result<QuestionDetails, Error> {
        let button: Option<ButtonDetail> = query_as("SELECT * FROM button_details WHERE question_id = $1")
            .bind(question_id)
            .fetch_optional(&mut self.executor)
            .await?;
        let checkbox: Option<CheckboxDetail> = query_as("SELECT * FROM checkbox_details WHERE question_id = $1")
            .bind(question_id)
            .fetch_optional(&mut self.executor)
            .await?;
        let reorder: Option<ReorderDetail> = query_as("SELECT * FROM reorder_details WHERE question_id = $1")
            .bind(question_id)
            .fetch_optional(&mut self.executor)
            .await?;
        let range: Option<RangeDetail> = query_as("SELECT * FROM range_details WHERE question_id = $1")
            .bind(question_id)
            .fetch_optional(&mut self.executor)
            .await?;
        let type_answer: Option<TypeAnswerDetail> = query_as("SELECT * FROM type_answer_details WHERE question_id = $1")
            .bind(question_id)
            .fetch_optional(&mut self.executor)
            .await?;
        let location: Option<LocationDetail> = query_as("SELECT * FROM location_details WHERE question_id = $1")
            .bind(question_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(QuestionDetails {
            button,
            checkbox,
            reorder,
            range,
            type_answer,
            location,
        })
    }

    async fn insert_media(&mut self, question_id: i32, media: &[MediaInsert]) -> Result<(), Error> {
        for item in media {
            query("INSERT INTO question_media (question_id, type, url, start_time, duration) VALUES ($1, $2, $3, $4, $5)")
                .bind(question_id)
                .bind(item.type_)
                .bind(&item.url)
                .bind(item.start_time)
                .bind(item.duration)
                .execute(&mut self.executor)
                .await?;
        }
        Ok(())
    }

    async fn delete_media(&mut self, question_id: i32) -> Result<(), Error> {
        query("DELETE FROM question_media WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn list_media(&mut self, question_id: i32) -> Result<Vec<MediaItem>, Error> {
        let media = query_as("SELECT * FROM question_media WHERE question_id = $1 ORDER BY id")
            .bind(question_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(media)
    }

    async fn insert_options(&mut self, question_id: i32, options: &[OptionInsert]) -> Result<(), Error> {
        for option in options {
            query("INSERT INTO question_options (question_id, text, is_correct, ord) VALUES ($1, $2, $3, $4)")
                .bind(question_id)
                .bind(&option.text)
                .bind(option.is_correct)
                .bind(option.ord)
                .execute(&mut self.executor)
                .await?;
        }
        Ok(())
    }

    async fn delete_options(&mut self, question_id: i32) -> Result<(), Error> {
        query("DELETE FROM question_options WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn list_options(&mut self, question_id: i32) -> Result<Vec<QuestionOption>, Error> {
        let options = query_as("SELECT * FROM question_options WHERE question_id = $1 ORDER BY id")
            .bind(question_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(options)
    }

    async fn quiz_brief(&mut self, quiz_id: i32) -> Result<QuizBrief, Error> {
        let brief = query_as("SELECT id, title FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(brief)
    }

    async fn question_ids_by_quiz(&mut self, quiz_id: i32) -> Result<Vec<i32>, Error> {
        let ids = query_scalar("SELECT id FROM questions WHERE quiz_id = $1 ORDER BY id")
            .bind(quiz_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(ids)
    }
}

impl<E> RatingStore for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn has_played(&mut self, user_id: i32, quiz_id: i32) -> Result<bool, Error> {
        let played = query_scalar(
            "SELECT EXISTS(SELECT mr.id FROM match_results AS mr JOIN matches AS m ON mr.match_id = m.id WHERE mr.user_id = $1 AND m.quiz_id = $2)",
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(played)
    }

    async fn has_rated(&mut self, user_id: i32, quiz_id: i32) -> Result<bool, Error> {
        let rated = query_scalar("SELECT EXISTS(SELECT id FROM quiz_ratings WHERE user_id = $1 AND quiz_id = $2)")
            .bind(user_id)
            .bind(quiz_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(rated)
    }

    async fn insert_rating(&mut self, data: RatingInsert) -> Result<QuizRating, Error> {
        let rating = query_as("INSERT INTO quiz_ratings (quiz_id, user_id, rating, text) VALUES ($1, $2, $3, $4) RETURNING *")
            .bind(data.quiz_id)
            .bind(data.user_id)
            .bind(data.rating)
            .bind(&data.text)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(rating)
    }
}

impl Store for PgStore<PoolConnection<Postgres>> {}
impl<'a> Store for PgStore<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgStore<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}
