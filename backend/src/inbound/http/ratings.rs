//! Rating handlers.
//!
//! ```text
//! POST /api/v1/ratings {"userId":1,"teaId":2,"umami":3.5,...,"rating":8}
//! GET /api/v1/ratings
//! PUT /api/v1/ratings/{id} {"floral":6}
//! DELETE /api/v1/ratings/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Attribute, Error, FlavourProfile, RatingDraft, RatingId, RatingPatch, Score, ScoreError,
    TeaId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{MessageResponse, RatingResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, require, score_error};

/// Rating fields. Submission needs all of them; edits send any subset.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    pub user_id: Option<i64>,
    pub tea_id: Option<i64>,
    pub umami: Option<f64>,
    pub astringency: Option<f64>,
    pub floral: Option<f64>,
    pub vegetal: Option<f64>,
    pub nutty: Option<f64>,
    pub roasted: Option<f64>,
    pub body: Option<f64>,
    /// Overall score.
    pub rating: Option<f64>,
}

impl RatingRequest {
    fn score(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::Umami => self.umami,
            Attribute::Astringency => self.astringency,
            Attribute::Floral => self.floral,
            Attribute::Vegetal => self.vegetal,
            Attribute::Nutty => self.nutty,
            Attribute::Roasted => self.roasted,
            Attribute::Body => self.body,
            Attribute::Rating => self.rating,
        }
    }
}

enum ProfileError {
    Missing(Attribute),
    Score(ScoreError),
}

impl From<ScoreError> for ProfileError {
    fn from(error: ScoreError) -> Self {
        Self::Score(error)
    }
}

impl From<ProfileError> for Error {
    fn from(error: ProfileError) -> Self {
        match error {
            ProfileError::Missing(attribute) => {
                missing_field_error(FieldName::new(attribute.as_str()))
            }
            ProfileError::Score(error) => score_error(&error),
        }
    }
}

fn draft_from(request: &RatingRequest) -> Result<RatingDraft, Error> {
    let user_id = require(request.user_id, FieldName::new("userId"))?;
    let tea_id = require(request.tea_id, FieldName::new("teaId"))?;
    let profile = FlavourProfile::try_build(|attribute| {
        request
            .score(attribute)
            .ok_or(ProfileError::Missing(attribute))
    })?;
    Ok(RatingDraft {
        user_id: UserId::new(user_id),
        tea_id: TeaId::new(tea_id),
        profile,
    })
}

fn patch_from(request: &RatingRequest) -> Result<RatingPatch, Error> {
    let mut patch = RatingPatch {
        user_id: request.user_id.map(UserId::new),
        tea_id: request.tea_id.map(TeaId::new),
        ..RatingPatch::default()
    };
    for attribute in Attribute::ALL {
        if let Some(value) = request.score(attribute) {
            let score = Score::new(attribute, value).map_err(|error| score_error(&error))?;
            patch.scores.insert(attribute, score);
        }
    }
    Ok(patch)
}

#[utoipa::path(
    post,
    path = "/api/v1/ratings",
    request_body = RatingRequest,
    responses(
        (status = 201, description = "Rating stored", body = RatingResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user or tea", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "submitRating"
)]
#[post("/ratings")]
pub async fn submit_rating(
    state: web::Data<HttpState>,
    payload: web::Json<RatingRequest>,
) -> ApiResult<HttpResponse> {
    let draft = draft_from(&payload)?;
    let rating = state.ratings.submit(draft).await?;
    Ok(HttpResponse::Created().json(RatingResponse::from(rating)))
}

#[utoipa::path(
    get,
    path = "/api/v1/ratings",
    responses((status = 200, description = "Ratings", body = [RatingResponse])),
    tags = ["ratings"],
    operation_id = "listRatings"
)]
#[get("/ratings")]
pub async fn list_ratings(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<RatingResponse>>> {
    let ratings = state.ratings_query.list_ratings().await?;
    Ok(web::Json(
        ratings.into_iter().map(RatingResponse::from).collect(),
    ))
}

/// Replace the fields present in the body. Changed references are
/// re-validated.
#[utoipa::path(
    put,
    path = "/api/v1/ratings/{id}",
    params(("id" = i64, Path, description = "Rating identifier")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating updated", body = RatingResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown rating, user or tea", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "editRating"
)]
#[put("/ratings/{id}")]
pub async fn edit_rating(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<RatingRequest>,
) -> ApiResult<web::Json<RatingResponse>> {
    let patch = patch_from(&payload)?;
    let rating = state
        .ratings
        .edit(RatingId::new(path.into_inner()), patch)
        .await?;
    Ok(web::Json(RatingResponse::from(rating)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/ratings/{id}",
    params(("id" = i64, Path, description = "Rating identifier")),
    responses(
        (status = 200, description = "Rating deleted", body = MessageResponse),
        (status = 404, description = "Unknown rating", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "deleteRating"
)]
#[delete("/ratings/{id}")]
pub async fn delete_rating(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = RatingId::new(path.into_inner());
    state.ratings.delete(id).await?;
    Ok(web::Json(MessageResponse::new(format!("rating {id} deleted"))))
}

#[cfg(test)]
#[path = "ratings_tests.rs"]
mod tests;
