//! Row structs for the tea tables and their conversions to domain types.

use diesel::prelude::*;

use crate::domain::{
    FlavourProfile, NormalizedName, RatingDraft, RatingId, Score, Tea, TeaDraft, TeaId, TeaRating,
    User, UserId,
};

use super::schema::{tea_ratings, teas, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TeaRow {
    pub id: i64,
    pub name: String,
    pub provider: String,
    pub source: Option<String>,
}

impl From<TeaRow> for Tea {
    fn from(row: TeaRow) -> Self {
        Self {
            id: TeaId::new(row.id),
            name: row.name,
            provider: row.provider,
            source: row.source,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = teas)]
pub(crate) struct NewTeaRow<'a> {
    pub name: &'a str,
    pub provider: &'a str,
    pub source: Option<&'a str>,
}

impl<'a> From<&'a TeaDraft> for NewTeaRow<'a> {
    fn from(draft: &'a TeaDraft) -> Self {
        Self {
            name: draft.name(),
            provider: draft.provider(),
            source: draft.source(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self::new(UserId::new(row.id), row.name)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
}

impl<'a> From<&'a NormalizedName> for NewUserRow<'a> {
    fn from(name: &'a NormalizedName) -> Self {
        Self {
            name: name.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = tea_ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RatingRow {
    pub id: i64,
    pub user_id: i64,
    pub tea_id: i64,
    pub umami: f64,
    pub astringency: f64,
    pub floral: f64,
    pub vegetal: f64,
    pub nutty: f64,
    pub roasted: f64,
    pub body: f64,
    pub rating: f64,
}

impl From<RatingRow> for TeaRating {
    fn from(row: RatingRow) -> Self {
        Self {
            id: RatingId::new(row.id),
            user_id: UserId::new(row.user_id),
            tea_id: TeaId::new(row.tea_id),
            profile: FlavourProfile {
                umami: Score::from_stored(row.umami),
                astringency: Score::from_stored(row.astringency),
                floral: Score::from_stored(row.floral),
                vegetal: Score::from_stored(row.vegetal),
                nutty: Score::from_stored(row.nutty),
                roasted: Score::from_stored(row.roasted),
                body: Score::from_stored(row.body),
                rating: Score::from_stored(row.rating),
            },
        }
    }
}

/// Every mutable rating column; used for inserts and full-row updates.
#[derive(Debug, Clone, Copy, Insertable, AsChangeset)]
#[diesel(table_name = tea_ratings)]
pub(crate) struct RatingValuesRow {
    pub user_id: i64,
    pub tea_id: i64,
    pub umami: f64,
    pub astringency: f64,
    pub floral: f64,
    pub vegetal: f64,
    pub nutty: f64,
    pub roasted: f64,
    pub body: f64,
    pub rating: f64,
}

impl RatingValuesRow {
    fn new(user_id: UserId, tea_id: TeaId, profile: &FlavourProfile) -> Self {
        Self {
            user_id: user_id.as_i64(),
            tea_id: tea_id.as_i64(),
            umami: profile.umami.value(),
            astringency: profile.astringency.value(),
            floral: profile.floral.value(),
            vegetal: profile.vegetal.value(),
            nutty: profile.nutty.value(),
            roasted: profile.roasted.value(),
            body: profile.body.value(),
            rating: profile.rating.value(),
        }
    }
}

impl From<&RatingDraft> for RatingValuesRow {
    fn from(draft: &RatingDraft) -> Self {
        Self::new(draft.user_id, draft.tea_id, &draft.profile)
    }
}

impl From<&TeaRating> for RatingValuesRow {
    fn from(rating: &TeaRating) -> Self {
        Self::new(rating.user_id, rating.tea_id, &rating.profile)
    }
}
