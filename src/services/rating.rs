//! Gate in front of rating writes: the rater must have a match result on the
//! target quiz and must not have rated it before. The same pair is also
//! unique at the storage level, which covers concurrent double submits.

use crate::db::RatingStore;
use crate::error::Error;
use crate::models::rating::{QuizRating, RatingInsert};

pub async fn post_rating<S>(
    store: &mut S,
    user_id: i32,
    quiz_id: i32,
    rating: i32,
    text: Option<String>,
) -> Result<QuizRating, Error>
where
    S: RatingStore,
{
    if !(1..=5).contains(&rating) {
        return Err(Error::Validation("rating must be between 1 and 5".into()));
    }
    if !store.has_played(user_id, quiz_id).await? {
        return Err(Error::Business("you have never played this quiz".into()));
    }
    if store.has_rated(user_id, quiz_id).await? {
        return Err(Error::Business("you have already rated this quiz".into()));
    }
    store
        .insert_rating(RatingInsert {
            quiz_id,
            user_id,
            rating,
            text,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct FakeRatingStore {
        next_id: i32,
        played: HashSet<(i32, i32)>,
        ratings: HashMap<(i32, i32), QuizRating>,
    }

    impl RatingStore for FakeRatingStore {
        async fn has_played(&mut self, user_id: i32, quiz_id: i32) -> Result<bool, Error> {
            Ok(self.played.contains(&(user_id, quiz_id)))
        }

        async fn has_rated(&mut self, user_id: i32, quiz_id: i32) -> Result<bool, Error> {
            Ok(self.ratings.contains_key(&(user_id, quiz_id)))
        }

        async fn insert_rating(&mut self, data: RatingInsert) -> Result<QuizRating, Error> {
            self.next_id += 1;
            let rating = QuizRating {
                id: self.next_id,
                quiz_id: data.quiz_id,
                user_id: data.user_id,
                rating: data.rating,
                text: data.text,
                created_at: Utc::now(),
            };
            self.ratings.insert((data.user_id, data.quiz_id), rating.clone());
            Ok(rating)
        }
    }

    #[tokio::test]
    async fn rating_without_a_played_match_is_rejected() {
        let mut store = FakeRatingStore::default();
        let err = post_rating(&mut store, 7, 3, 4, None).await.unwrap_err();
        assert!(matches!(err, Error::Business(message) if message.contains("never played")));
    }

    #[tokio::test]
    async fn first_rating_after_playing_succeeds() {
        let mut store = FakeRatingStore::default();
        store.played.insert((7, 3));
        let rating = post_rating(&mut store, 7, 3, 4, Some("good one".into())).await.unwrap();
        assert_eq!(rating.quiz_id, 3);
        assert_eq!(rating.rating, 4);
    }

    #[tokio::test]
    async fn second_rating_by_the_same_user_is_rejected() {
        let mut store = FakeRatingStore::default();
        store.played.insert((7, 3));
        post_rating(&mut store, 7, 3, 4, None).await.unwrap();
        let err = post_rating(&mut store, 7, 3, 5, None).await.unwrap_err();
        assert!(matches!(err, Error::Business(message) if message.contains("already rated")));
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected_before_the_gate() {
        let mut store = FakeRatingStore::default();
        let err = post_rating(&mut store, 7, 3, 6, None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
