//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod dto;
pub mod error;
pub mod health;
pub mod ratings;
pub mod state;
pub mod summary;
pub mod teas;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use teahouse::inbound::http::configure;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register_user)
        .service(users::login)
        .service(users::logout)
        .service(users::get_user)
        .service(users::list_user_ratings)
        .service(teas::list_teas)
        .service(teas::register_tea)
        .service(teas::drop_teas)
        .service(teas::seed_teas)
        .service(ratings::submit_rating)
        .service(ratings::list_ratings)
        .service(ratings::edit_rating)
        .service(ratings::delete_rating)
        .service(summary::rating_summary)
        .service(admin::dashboard)
        .service(admin::reconcile_users);
}
