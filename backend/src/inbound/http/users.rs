//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"name":"Amy"}
//! POST /api/v1/login {"name":"amy"}
//! POST /api/v1/logout
//! GET /api/v1/users/{id}
//! GET /api/v1/users/{id}/ratings
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::IssuedToken;
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{MessageResponse, RatingWithTeaResponse, UserResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const NAME: FieldName = FieldName::new("name");

/// Body for registration and login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NameRequest {
    #[schema(example = "Amy")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: i64,
    pub name: String,
    #[schema(example = "user-1")]
    pub token: String,
}

impl From<IssuedToken> for RegisterResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            id: issued.user.id().as_i64(),
            name: issued.user.name().to_owned(),
            token: issued.token.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: i64,
    #[schema(example = "user-1")]
    pub token: String,
}

/// Register a user under a new name.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = NameRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Name already taken", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<NameRequest>,
) -> ApiResult<HttpResponse> {
    let name = require(payload.into_inner().name, NAME)?;
    let issued = state.accounts.register(&name).await?;
    Ok(HttpResponse::Created().json(RegisterResponse::from(issued)))
}

/// Sign in by name and receive an access token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = NameRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<NameRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let name = require(payload.into_inner().name, NAME)?;
    let issued = state.accounts.login(&name).await?;
    Ok(web::Json(LoginResponse {
        user_id: issued.user.id().as_i64(),
        token: issued.token.as_str().to_owned(),
    }))
}

/// Tokens are stateless, so logging out only acknowledges the request.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout() -> web::Json<MessageResponse> {
    web::Json(MessageResponse::new("logged out"))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .identities
        .find_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// A user's ratings with the name and provider of each tea.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/ratings",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Ratings", body = [RatingWithTeaResponse]),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUserRatings"
)]
#[get("/users/{id}/ratings")]
pub async fn list_user_ratings(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<RatingWithTeaResponse>>> {
    let entries = state
        .ratings_query
        .ratings_for_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(
        entries.into_iter().map(RatingWithTeaResponse::from).collect(),
    ))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
