//! Create/update protocol for the question aggregate: one question row, one
//! type-detail row selected by the question kind, plus owned media and option
//! rows, written through an injected store.

use crate::db::QuestionStore;
use crate::error::Error;
use crate::models::question::{
    KindFields, QuestionAggregate, QuestionInsert, QuestionKind, QuestionPatch, QuestionPayload, QuestionType,
    QuestionUpdatePayload,
};

/// Maps the flat request fields onto the kind's variant, rejecting payloads
/// that miss a required field. Range bounds are accepted as given; there is
/// no ordering check between minValue and maxValue.
pub fn build_kind(type_: QuestionType, fields: &KindFields) -> Result<QuestionKind, Error> {
    match type_ {
        QuestionType::Buttons => Ok(QuestionKind::Buttons),
        QuestionType::Checkboxes => Ok(QuestionKind::Checkboxes),
        QuestionType::Reorder => Ok(QuestionKind::Reorder),
        QuestionType::Range => match (fields.min_value, fields.max_value, fields.correct_value) {
            (Some(min_value), Some(max_value), Some(correct_value)) => Ok(QuestionKind::Range {
                min_value,
                max_value,
                correct_value,
            }),
            _ => Err(Error::Validation(
                "minValue, maxValue and correctValue are required for a range question".into(),
            )),
        },
        QuestionType::TypeAnswer => fields
            .correct_answer
            .clone()
            .map(|correct_answer| QuestionKind::TypeAnswer { correct_answer })
            .ok_or_else(|| Error::Validation("correctAnswer is required for a type-answer question".into())),
        QuestionType::Location => match (fields.correct_latitude, fields.correct_longitude) {
            (Some(correct_latitude), Some(correct_longitude)) => Ok(QuestionKind::Location {
                correct_latitude,
                correct_longitude,
            }),
            _ => Err(Error::Validation(
                "correctLatitude and correctLongitude are required together for a location question".into(),
            )),
        },
    }
}

pub async fn create_question<S>(store: &mut S, payload: QuestionPayload) -> Result<QuestionAggregate, Error>
where
    S: QuestionStore,
{
    let kind = build_kind(payload.type_, &payload.fields)?;
    let id = store
        .insert_question(QuestionInsert {
            quiz_id: payload.quiz_id,
            text: payload.text,
            type_: kind.type_tag(),
        })
        .await?;
    store.insert_detail(id, &kind).await?;
    store.insert_media(id, &payload.media).await?;
    store.insert_options(id, &payload.options).await?;
    let mut aggregate = load_question(store, id).await?;
    aggregate.quiz = Some(store.quiz_brief(aggregate.quiz_id).await?);
    Ok(aggregate)
}

/// Replace semantics for the owned collections: the stored media and option
/// rows are dropped and rebuilt from the payload on every update. The type
/// detail is upserted keyed on the question; on a type change the previous
/// kind's row stays in place.
pub async fn update_question<S>(store: &mut S, id: i32, payload: QuestionUpdatePayload) -> Result<QuestionAggregate, Error>
where
    S: QuestionStore,
{
    let kind = match payload.type_ {
        Some(type_) => Some(build_kind(type_, &payload.fields)?),
        None => None,
    };
    store
        .patch_question(
            id,
            QuestionPatch {
                text: payload.text,
                type_: kind.as_ref().map(QuestionKind::type_tag),
            },
        )
        .await?;
    if let Some(kind) = &kind {
        store.upsert_detail(id, kind).await?;
    }
    store.delete_media(id).await?;
    store.insert_media(id, &payload.media).await?;
    store.delete_options(id).await?;
    store.insert_options(id, &payload.options).await?;
    load_question(store, id).await
}

pub async fn load_question<S>(store: &mut S, id: i32) -> Result<QuestionAggregate, Error>
where
    S: QuestionStore,
{
    let question = store.get_question(id).await?;
    let details = store.load_details(id).await?;
    let media = store.list_media(id).await?;
    let options = store.list_options(id).await?;
    Ok(QuestionAggregate {
        id: question.id,
        quiz_id: question.quiz_id,
        text: question.text,
        type_: question.type_,
        details,
        media,
        options,
        quiz: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{
        ButtonDetail, CheckboxDetail, LocationDetail, MediaInsert, MediaItem, MediaType, OptionInsert, Question,
        QuestionDetails, QuestionOption, RangeDetail, ReorderDetail, TypeAnswerDetail,
    };
    use crate::models::quiz::QuizBrief;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeStore {
        next_id: i32,
        questions: HashMap<i32, Question>,
        buttons: HashMap<i32, ButtonDetail>,
        checkboxes: HashMap<i32, CheckboxDetail>,
        reorders: HashMap<i32, ReorderDetail>,
        ranges: HashMap<i32, RangeDetail>,
        type_answers: HashMap<i32, TypeAnswerDetail>,
        locations: HashMap<i32, LocationDetail>,
        media: HashMap<i32, Vec<MediaItem>>,
        options: HashMap<i32, Vec<QuestionOption>>,
        quizzes: HashMap<i32, QuizBrief>,
    }

    impl FakeStore {
        fn with_quiz(quiz_id: i32) -> Self {
            let mut store = FakeStore::default();
            store.quizzes.insert(
                quiz_id,
                QuizBrief {
                    id: quiz_id,
                    title: "Capitals of the world".into(),
                },
            );
            store
        }

        fn next(&mut self) -> i32 {
            self.next_id += 1;
            self.next_id
        }
    }

    impl QuestionStore for FakeStore {
        async fn insert_question(&mut self, data: QuestionInsert) -> Result<i32, Error> {
            if !self.quizzes.contains_key(&data.quiz_id) {
                return Err(Error::NotFound("quiz"));
            }
            let id = self.next();
            self.questions.insert(
                id,
                Question {
                    id,
                    quiz_id: data.quiz_id,
                    text: data.text,
                    type_: data.type_,
                },
            );
            Ok(id)
        }

        async fn patch_question(&mut self, id: i32, patch: QuestionPatch) -> Result<(), Error> {
            let question = self
                .questions
                .get_mut(&id)
                .ok_or(Error::Database(sqlx::Error::RowNotFound))?;
            if let Some(text) = patch.text {
                question.text = text;
            }
            if let Some(type_) = patch.type_ {
                question.type_ = type_;
            }
            Ok(())
        }

        async fn get_question(&mut self, id: i32) -> Result<Question, Error> {
            self.questions.get(&id).cloned().ok_or(Error::Database(sqlx::Error::RowNotFound))
        }

        async fn delete_question(&mut self, id: i32) -> Result<u64, Error> {
            Ok(self.questions.remove(&id).map(|_| 1).unwrap_or(0))
        }

        async fn insert_detail(&mut self, question_id: i32, kind: &QuestionKind) -> Result<(), Error> {
            self.upsert_detail(question_id, kind).await
        }

        async fn upsert_detail(&mut self, question_id: i32, kind: &QuestionKind) -> Result<(), Error> {
            let id = self.next();
            match kind {
                QuestionKind::Buttons => {
                    self.buttons.entry(question_id).or_insert(ButtonDetail { id, question_id });
                }
                QuestionKind::Checkboxes => {
                    self.checkboxes.entry(question_id).or_insert(CheckboxDetail { id, question_id });
                }
                QuestionKind::Reorder => {
                    self.reorders.entry(question_id).or_insert(ReorderDetail { id, question_id });
                }
                QuestionKind::Range {
                    min_value,
                    max_value,
                    correct_value,
                } => {
                    let entry = self.ranges.entry(question_id).or_insert(RangeDetail {
                        id,
                        question_id,
                        min_value: 0.0,
                        max_value: 0.0,
                        correct_value: 0.0,
                    });
                    entry.min_value = *min_value;
                    entry.max_value = *max_value;
                    entry.correct_value = *correct_value;
                }
                QuestionKind::TypeAnswer { correct_answer } => {
                    let entry = self.type_answers.entry(question_id).or_insert(TypeAnswerDetail {
                        id,
                        question_id,
                        correct_answer: String::new(),
                    });
                    entry.correct_answer = correct_answer.clone();
                }
                QuestionKind::Location {
                    correct_latitude,
                    correct_longitude,
                } => {
                    let entry = self.locations.entry(question_id).or_insert(LocationDetail {
                        id,
                        question_id,
                        correct_latitude: 0.0,
                        correct_longitude: 0.0,
                    });
                    entry.correct_latitude = *correct_latitude;
                    entry.correct_longitude = *correct_longitude;
                }
            }
            Ok(())
        }

        async fn load_details(&mut self, question_id: i32) -> Result<QuestionDetails, Error> {
            Ok(QuestionDetails {
                button: self.buttons.get(&question_id).cloned(),
                checkbox: self.checkboxes.get(&question_id).cloned(),
                reorder: self.reorders.get(&question_id).cloned(),
                range: self.ranges.get(&question_id).cloned(),
                type_answer: self.type_answers.get(&question_id).cloned(),
                location: self.locations.get(&question_id).cloned(),
            })
        }

        async fn insert_media(&mut self, question_id: i32, media: &[MediaInsert]) -> Result<(), Error> {
            for item in media {
                let id = self.next();
                self.media.entry(question_id).or_default().push(MediaItem {
                    id,
                    question_id,
                    type_: item.type_,
                    url: item.url.clone(),
                    start_time: item.start_time,
                    duration: item.duration,
                });
            }
            Ok(())
        }

        async fn delete_media(&mut self, question_id: i32) -> Result<(), Error> {
            self.media.remove(&question_id);
            Ok(())
        }

        async fn list_media(&mut self, question_id: i32) -> Result<Vec<MediaItem>, Error> {
            Ok(self.media.get(&question_id).cloned().unwrap_or_default())
        }

        async fn insert_options(&mut self, question_id: i32, options: &[OptionInsert]) -> Result<(), Error> {
            for option in options {
                let id = self.next();
                self.options.entry(question_id).or_default().push(QuestionOption {
                    id,
                    question_id,
                    text: option.text.clone(),
                    is_correct: option.is_correct,
                    ord: option.ord,
                });
            }
            Ok(())
        }

        async fn delete_options(&mut self, question_id: i32) -> Result<(), Error> {
            self.options.remove(&question_id);
            Ok(())
        }

        async fn list_options(&mut self, question_id: i32) -> Result<Vec<QuestionOption>, Error> {
            Ok(self.options.get(&question_id).cloned().unwrap_or_default())
        }

        async fn quiz_brief(&mut self, quiz_id: i32) -> Result<QuizBrief, Error> {
            self.quizzes.get(&quiz_id).cloned().ok_or(Error::Database(sqlx::Error::RowNotFound))
        }

        async fn question_ids_by_quiz(&mut self, quiz_id: i32) -> Result<Vec<i32>, Error> {
            let mut ids: Vec<i32> = self
                .questions
                .values()
                .filter(|q| q.quiz_id == quiz_id)
                .map(|q| q.id)
                .collect();
            ids.sort_unstable();
            Ok(ids)
        }
    }

    fn fields_for(type_: QuestionType) -> KindFields {
        match type_ {
            QuestionType::Range => KindFields {
                min_value: Some(0.0),
                max_value: Some(10.0),
                correct_value: Some(7.0),
                ..KindFields::default()
            },
            QuestionType::TypeAnswer => KindFields {
                correct_answer: Some("Paris".into()),
                ..KindFields::default()
            },
            QuestionType::Location => KindFields {
                correct_latitude: Some(48.85),
                correct_longitude: Some(2.35),
                ..KindFields::default()
            },
            _ => KindFields::default(),
        }
    }

    fn payload_for(type_: QuestionType) -> QuestionPayload {
        QuestionPayload {
            quiz_id: 1,
            text: "What is the capital of France?".into(),
            type_,
            fields: fields_for(type_),
            media: Vec::new(),
            options: Vec::new(),
        }
    }

    fn populated_slots(details: &QuestionDetails) -> Vec<&'static str> {
        let mut slots = Vec::new();
        if details.button.is_some() {
            slots.push("button");
        }
        if details.checkbox.is_some() {
            slots.push("checkbox");
        }
        if details.reorder.is_some() {
            slots.push("reorder");
        }
        if details.range.is_some() {
            slots.push("range");
        }
        if details.type_answer.is_some() {
            slots.push("typeAnswer");
        }
        if details.location.is_some() {
            slots.push("location");
        }
        slots
    }

    const ALL_TYPES: [(QuestionType, &str); 6] = [
        (QuestionType::Buttons, "button"),
        (QuestionType::Checkboxes, "checkbox"),
        (QuestionType::Range, "range"),
        (QuestionType::Reorder, "reorder"),
        (QuestionType::Location, "location"),
        (QuestionType::TypeAnswer, "typeAnswer"),
    ];

    #[tokio::test]
    async fn create_populates_exactly_the_matching_detail() {
        for (type_, slot) in ALL_TYPES {
            let mut store = FakeStore::with_quiz(1);
            let aggregate = create_question(&mut store, payload_for(type_)).await.unwrap();
            assert_eq!(aggregate.type_, type_);
            assert_eq!(populated_slots(&aggregate.details), vec![slot]);
        }
    }

    #[tokio::test]
    async fn create_attaches_the_owning_quiz() {
        let mut store = FakeStore::with_quiz(1);
        let aggregate = create_question(&mut store, payload_for(QuestionType::Buttons)).await.unwrap();
        assert_eq!(aggregate.quiz.unwrap().title, "Capitals of the world");
    }

    #[tokio::test]
    async fn range_bounds_are_stored_unordered() {
        let mut store = FakeStore::with_quiz(1);
        let mut payload = payload_for(QuestionType::Range);
        payload.fields.min_value = Some(5.0);
        payload.fields.max_value = Some(1.0);
        payload.fields.correct_value = Some(3.0);
        let aggregate = create_question(&mut store, payload).await.unwrap();
        let range = aggregate.details.range.unwrap();
        assert_eq!(range.min_value, 5.0);
        assert_eq!(range.max_value, 1.0);
        assert_eq!(range.correct_value, 3.0);
    }

    #[tokio::test]
    async fn type_answer_aggregate_carries_answer_and_empty_collections() {
        let mut store = FakeStore::with_quiz(1);
        let aggregate = create_question(&mut store, payload_for(QuestionType::TypeAnswer)).await.unwrap();
        assert_eq!(aggregate.type_, QuestionType::TypeAnswer);
        assert_eq!(aggregate.details.type_answer.unwrap().correct_answer, "Paris");
        assert!(aggregate.options.is_empty());
        assert!(aggregate.media.is_empty());
    }

    #[tokio::test]
    async fn create_stores_media_and_options_in_order() {
        let mut store = FakeStore::with_quiz(1);
        let mut payload = payload_for(QuestionType::Checkboxes);
        payload.media = vec![MediaInsert {
            type_: MediaType::Image,
            url: "https://img.example/one.png".into(),
            start_time: None,
            duration: None,
        }];
        payload.options = vec![
            OptionInsert {
                text: "Paris".into(),
                is_correct: true,
                ord: Some(1),
            },
            OptionInsert {
                text: "Lyon".into(),
                is_correct: false,
                ord: Some(2),
            },
        ];
        let aggregate = create_question(&mut store, payload).await.unwrap();
        assert_eq!(aggregate.media.len(), 1);
        let texts: Vec<&str> = aggregate.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["Paris", "Lyon"]);
    }

    #[tokio::test]
    async fn update_replaces_options_wholesale() {
        let mut store = FakeStore::with_quiz(1);
        let mut payload = payload_for(QuestionType::Buttons);
        payload.options = vec![
            OptionInsert {
                text: "A".into(),
                is_correct: false,
                ord: None,
            },
            OptionInsert {
                text: "B".into(),
                is_correct: false,
                ord: None,
            },
        ];
        let created = create_question(&mut store, payload).await.unwrap();

        let update = QuestionUpdatePayload {
            type_: Some(QuestionType::Buttons),
            options: vec![OptionInsert {
                text: "C".into(),
                is_correct: true,
                ord: None,
            }],
            ..QuestionUpdatePayload::default()
        };
        let updated = update_question(&mut store, created.id, update).await.unwrap();
        assert_eq!(updated.options.len(), 1);
        assert_eq!(updated.options[0].text, "C");
    }

    #[tokio::test]
    async fn update_with_empty_lists_clears_collections() {
        let mut store = FakeStore::with_quiz(1);
        let mut payload = payload_for(QuestionType::Buttons);
        payload.media = vec![MediaInsert {
            type_: MediaType::Video,
            url: "https://videos.example/v".into(),
            start_time: Some(4.0),
            duration: Some(20.0),
        }];
        payload.options = vec![OptionInsert {
            text: "A".into(),
            is_correct: false,
            ord: None,
        }];
        let created = create_question(&mut store, payload).await.unwrap();

        let update = QuestionUpdatePayload {
            type_: Some(QuestionType::Buttons),
            ..QuestionUpdatePayload::default()
        };
        let updated = update_question(&mut store, created.id, update).await.unwrap();
        assert!(updated.media.is_empty());
        assert!(updated.options.is_empty());
    }

    #[tokio::test]
    async fn type_change_leaves_previous_detail_in_place() {
        let mut store = FakeStore::with_quiz(1);
        let created = create_question(&mut store, payload_for(QuestionType::Buttons)).await.unwrap();

        let update = QuestionUpdatePayload {
            type_: Some(QuestionType::Range),
            fields: fields_for(QuestionType::Range),
            ..QuestionUpdatePayload::default()
        };
        let updated = update_question(&mut store, created.id, update).await.unwrap();
        assert_eq!(updated.type_, QuestionType::Range);
        // Both the stale button row and the new range row are present.
        assert_eq!(populated_slots(&updated.details), vec!["button", "range"]);
    }

    #[tokio::test]
    async fn update_of_missing_question_is_not_found() {
        let mut store = FakeStore::with_quiz(1);
        let update = QuestionUpdatePayload {
            text: Some("anything".into()),
            ..QuestionUpdatePayload::default()
        };
        let err = update_question(&mut store, 42, update).await.unwrap_err();
        assert!(matches!(err, Error::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn missing_kind_fields_fail_validation() {
        let err = build_kind(QuestionType::Range, &KindFields::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = build_kind(QuestionType::TypeAnswer, &KindFields::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let only_latitude = KindFields {
            correct_latitude: Some(48.85),
            ..KindFields::default()
        };
        let err = build_kind(QuestionType::Location, &only_latitude).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn option_kinds_need_no_fields() {
        for type_ in [QuestionType::Buttons, QuestionType::Checkboxes, QuestionType::Reorder] {
            let kind = build_kind(type_, &KindFields::default()).unwrap();
            assert_eq!(kind.type_tag(), type_);
        }
    }
}
