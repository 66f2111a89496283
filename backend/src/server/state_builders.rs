//! Builders for HTTP state over the Diesel repositories.

use std::sync::Arc;

use actix_web::web;

use teahouse::inbound::http::state::HttpState;
use teahouse::outbound::persistence::{
    DbPool, DieselRatingRepository, DieselTeaRepository, DieselUserRepository,
};

/// Build the shared HTTP state with every port backed by `pool`.
pub(super) fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    web::Data::new(HttpState::from_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselTeaRepository::new(pool.clone())),
        Arc::new(DieselRatingRepository::new(pool.clone())),
    ))
}
