//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;
use actix_web::{App, web};
use serde_json::Value;

use crate::domain::ports::IssuedToken;
use crate::domain::{Tea, TeaDraft};
use crate::test_support::InMemoryStore;

use super::state::HttpState;

/// HTTP state wired over a fresh in-memory store.
pub struct TestHarness {
    pub store: Arc<InMemoryStore>,
    state: web::Data<HttpState>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = HttpState::from_repositories(store.clone(), store.clone(), store.clone());
        Self {
            store,
            state: web::Data::new(state),
        }
    }

    pub fn data(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    /// Register `name` through the account service.
    pub async fn register(&self, name: &str) -> IssuedToken {
        self.state
            .accounts
            .register(name)
            .await
            .expect("registration succeeds")
    }

    /// Register a tea through the catalogue service.
    pub async fn add_tea(&self, name: &str, provider: &str, source: Option<&str>) -> Tea {
        let draft = TeaDraft::new(name, provider, source).expect("valid tea");
        self.state
            .catalogue
            .register_tea(draft)
            .await
            .expect("tea stored")
    }

    /// Initialise the full `/api/v1` surface over this harness.
    pub async fn service(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        actix_test::init_service(
            App::new()
                .app_data(self.data())
                .service(web::scope("/api/v1").configure(super::configure)),
        )
        .await
    }
}

/// Read a response body as JSON.
pub async fn json_body(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}
