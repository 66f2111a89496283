//! Tea catalogue handlers.
//!
//! ```text
//! GET /api/v1/teas[?userId=1]
//! POST /api/v1/teas {"name":"Dragonwell","provider":"Clovis","source":"Hangzhou"}
//! POST /api/v1/admin/teas/drop
//! POST /api/v1/admin/teas/seed
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Tea, TeaDraft, TeaValidationError, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminUser;
use crate::inbound::http::dto::TeaResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, empty_field_error, require};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TeaListQuery {
    /// Restrict the list to teas this user has not rated.
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeaRequest {
    #[schema(example = "Dragonwell")]
    pub name: Option<String>,
    #[schema(example = "Clovis")]
    pub provider: Option<String>,
    pub source: Option<String>,
}

/// Row counts removed by the catalogue wipe.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DropResponse {
    pub message: String,
    pub teas_removed: u64,
    pub ratings_removed: u64,
}

fn map_tea_validation_error(error: TeaValidationError) -> Error {
    match error {
        TeaValidationError::EmptyName => empty_field_error(FieldName::new("name")),
        TeaValidationError::EmptyProvider => empty_field_error(FieldName::new("provider")),
    }
}

fn tea_list(teas: Vec<Tea>) -> Vec<TeaResponse> {
    teas.into_iter().map(TeaResponse::from).collect()
}

/// List teas, or the teas a user has not rated yet when `userId` is given.
#[utoipa::path(
    get,
    path = "/api/v1/teas",
    params(TeaListQuery),
    responses(
        (status = 200, description = "Teas", body = [TeaResponse]),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["teas"],
    operation_id = "listTeas"
)]
#[get("/teas")]
pub async fn list_teas(
    state: web::Data<HttpState>,
    query: web::Query<TeaListQuery>,
) -> ApiResult<web::Json<Vec<TeaResponse>>> {
    let teas = match query.user_id {
        Some(raw) => {
            state
                .catalogue_query
                .candidate_teas(UserId::new(raw))
                .await?
        }
        None => state.catalogue_query.list_teas().await?,
    };
    Ok(web::Json(tea_list(teas)))
}

#[utoipa::path(
    post,
    path = "/api/v1/teas",
    request_body = TeaRequest,
    responses(
        (status = 201, description = "Tea created", body = TeaResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Tea already exists", body = Error)
    ),
    tags = ["teas"],
    operation_id = "registerTea"
)]
#[post("/teas")]
pub async fn register_tea(
    state: web::Data<HttpState>,
    payload: web::Json<TeaRequest>,
) -> ApiResult<HttpResponse> {
    let TeaRequest {
        name,
        provider,
        source,
    } = payload.into_inner();
    let name = require(name, FieldName::new("name"))?;
    let provider = require(provider, FieldName::new("provider"))?;
    let draft =
        TeaDraft::new(&name, &provider, source.as_deref()).map_err(map_tea_validation_error)?;
    let tea = state.catalogue.register_tea(draft).await?;
    Ok(HttpResponse::Created().json(TeaResponse::from(tea)))
}

/// Remove every rating and tea in one transaction.
#[utoipa::path(
    post,
    path = "/api/v1/admin/teas/drop",
    responses(
        (status = 200, description = "Catalogue emptied", body = DropResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Rolled back", body = Error)
    ),
    tags = ["admin"],
    operation_id = "dropTeas"
)]
#[post("/admin/teas/drop")]
pub async fn drop_teas(
    state: web::Data<HttpState>,
    _admin: AdminUser,
) -> ApiResult<web::Json<DropResponse>> {
    let wipe = state.catalogue.drop_all().await?;
    Ok(web::Json(DropResponse {
        message: format!(
            "removed {} teas and {} ratings",
            wipe.teas_removed, wipe.ratings_removed
        ),
        teas_removed: wipe.teas_removed,
        ratings_removed: wipe.ratings_removed,
    }))
}

/// Insert the starter catalogue, skipping teas already present.
#[utoipa::path(
    post,
    path = "/api/v1/admin/teas/seed",
    responses(
        (status = 201, description = "Teas inserted", body = [TeaResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Rolled back", body = Error)
    ),
    tags = ["admin"],
    operation_id = "seedTeas"
)]
#[post("/admin/teas/seed")]
pub async fn seed_teas(
    state: web::Data<HttpState>,
    _admin: AdminUser,
) -> ApiResult<HttpResponse> {
    let inserted = state.catalogue.seed_samples().await?;
    Ok(HttpResponse::Created().json(tea_list(inserted)))
}

#[cfg(test)]
#[path = "teas_tests.rs"]
mod tests;

