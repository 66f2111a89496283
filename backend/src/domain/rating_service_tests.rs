//! Tests for the rating service.

use std::collections::BTreeMap;
use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockRatingRepository, MockTeaRepository, MockUserRepository};
use crate::domain::{Attribute, ErrorCode, FlavourProfile, Score, ScoreError, Tea, User};

type Service = RatingService<MockRatingRepository, MockTeaRepository, MockUserRepository>;

#[fixture]
fn profile() -> FlavourProfile {
    FlavourProfile::try_build(|_| Ok::<_, ScoreError>(5.0)).expect("scores in range")
}

fn make_service(
    ratings: MockRatingRepository,
    teas: MockTeaRepository,
    users: MockUserRepository,
) -> Service {
    RatingService::new(Arc::new(ratings), Arc::new(teas), Arc::new(users))
}

fn users_that_exist() -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(User::new(id, format!("user-{id}")))));
    users
}

fn teas_that_exist() -> MockTeaRepository {
    let mut teas = MockTeaRepository::new();
    teas.expect_find_by_id().returning(|id| {
        Ok(Some(Tea {
            id,
            name: format!("tea-{id}"),
            provider: "Itsi".to_owned(),
            source: None,
        }))
    });
    teas
}

fn stored(profile: FlavourProfile) -> TeaRating {
    TeaRating {
        id: RatingId::new(10),
        user_id: UserId::new(1),
        tea_id: TeaId::new(2),
        profile,
    }
}

#[rstest]
#[tokio::test]
async fn submit_rejects_unknown_tea_before_writing(profile: FlavourProfile) {
    let mut teas = MockTeaRepository::new();
    teas.expect_find_by_id().return_once(|_| Ok(None));
    let mut ratings = MockRatingRepository::new();
    ratings.expect_insert().never();

    let draft = RatingDraft {
        user_id: UserId::new(1),
        tea_id: TeaId::new(404),
        profile,
    };
    let error = make_service(ratings, teas, users_that_exist())
        .submit(draft)
        .await
        .expect_err("unknown tea");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn submit_rejects_unknown_user_before_writing(profile: FlavourProfile) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let mut ratings = MockRatingRepository::new();
    ratings.expect_insert().never();

    let draft = RatingDraft {
        user_id: UserId::new(77),
        tea_id: TeaId::new(1),
        profile,
    };
    let error = make_service(ratings, teas_that_exist(), users)
        .submit(draft)
        .await
        .expect_err("unknown user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn submit_stores_valid_drafts(profile: FlavourProfile) {
    let mut ratings = MockRatingRepository::new();
    ratings
        .expect_insert()
        .times(1)
        .return_once(|draft| Ok(draft.into_rating(RatingId::new(1))));

    let draft = RatingDraft {
        user_id: UserId::new(1),
        tea_id: TeaId::new(2),
        profile,
    };
    let rating = make_service(ratings, teas_that_exist(), users_that_exist())
        .submit(draft)
        .await
        .expect("rating stored");
    assert_eq!(rating.id, RatingId::new(1));
}

#[rstest]
#[tokio::test]
async fn edit_writes_the_merged_rating(profile: FlavourProfile) {
    let mut ratings = MockRatingRepository::new();
    ratings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored(profile))));
    ratings
        .expect_update()
        .withf(|rating| {
            rating.profile.get(Attribute::Body) == 9.0 && rating.profile.get(Attribute::Umami) == 5.0
        })
        .times(1)
        .return_once(|rating| Ok(Some(*rating)));

    let patch = RatingPatch {
        scores: BTreeMap::from([(
            Attribute::Body,
            Score::new(Attribute::Body, 9.0).expect("valid"),
        )]),
        ..RatingPatch::default()
    };
    let updated = make_service(ratings, teas_that_exist(), users_that_exist())
        .edit(RatingId::new(10), patch)
        .await
        .expect("edit succeeds");
    assert_eq!(updated.profile.get(Attribute::Body), 9.0);
}

#[rstest]
#[tokio::test]
async fn edit_revalidates_a_changed_tea_reference(profile: FlavourProfile) {
    let mut ratings = MockRatingRepository::new();
    ratings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored(profile))));
    ratings.expect_update().never();
    let mut teas = MockTeaRepository::new();
    teas.expect_find_by_id().return_once(|_| Ok(None));

    let patch = RatingPatch {
        tea_id: Some(TeaId::new(404)),
        ..RatingPatch::default()
    };
    let error = make_service(ratings, teas, users_that_exist())
        .edit(RatingId::new(10), patch)
        .await
        .expect_err("dangling tea");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn edit_of_missing_rating_is_not_found() {
    let mut ratings = MockRatingRepository::new();
    ratings.expect_find_by_id().return_once(|_| Ok(None));

    let error = make_service(ratings, MockTeaRepository::new(), MockUserRepository::new())
        .edit(RatingId::new(3), RatingPatch::default())
        .await
        .expect_err("missing rating");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_rows(#[case] removed: bool, #[case] expected: Option<ErrorCode>) {
    let mut ratings = MockRatingRepository::new();
    ratings.expect_delete().return_once(move |_| Ok(removed));

    let result = make_service(ratings, MockTeaRepository::new(), MockUserRepository::new())
        .delete(RatingId::new(8))
        .await;
    assert_eq!(result.err().map(|error| error.code()), expected);
}

#[tokio::test]
async fn ratings_for_unknown_user_are_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let mut ratings = MockRatingRepository::new();
    ratings.expect_list_with_teas().never();

    let error = make_service(ratings, MockTeaRepository::new(), users)
        .ratings_for_user(UserId::new(5))
        .await
        .expect_err("unknown user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
