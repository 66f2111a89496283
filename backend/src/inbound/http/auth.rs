//! Token extraction for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! token decoding and the admin check here. The `Authorization` header carries
//! the token either raw or behind a `Bearer ` scheme.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};

use super::state::HttpState;

/// The user named by the request's access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// An authenticated user whose normalised name is `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

fn raw_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing access token"))?;
    header
        .to_str()
        .map(str::to_owned)
        .map_err(|_| Error::unauthorized("access token must be ASCII"))
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

/// Require administrative rights.
pub fn require_admin(user: User) -> Result<User, Error> {
    if user.is_admin() {
        Ok(user)
    } else {
        Err(Error::forbidden("admin access required"))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = raw_token(req);
        let state = http_state(req);
        Box::pin(async move {
            let token = token?;
            let state = state?;
            state.identities.resolve_token(&token).await.map(Self)
        })
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let authenticated = AuthenticatedUser::from_request(req, payload);
        Box::pin(async move {
            let AuthenticatedUser(user) = authenticated.await?;
            require_admin(user).map(Self)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::UserReconciliation;
    use crate::domain::{AccessToken, ErrorCode, UserId, UserReconciler};
    use crate::inbound::http::test_utils::TestHarness;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};
    use rstest::rstest;

    fn a_user_named_amy() -> User {
        User::new(UserId::new(2), "amy")
    }

    #[rstest]
    #[case(" Admin ")]
    #[case("ADMIN")]
    fn admin_check_uses_the_normalised_name(#[case] name: &str) {
        let result = require_admin(User::new(UserId::new(1), name));
        assert!(result.is_ok());
    }

    #[rstest]
    fn other_users_are_forbidden() {
        let error = require_admin(a_user_named_amy()).expect_err("non-admin rejected");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    async fn call_with_header(harness: &TestHarness, header: Option<&str>) -> StatusCode {
        let app = actix_test::init_service(App::new().app_data(harness.data()).route(
            "/whoami",
            web::get().to(|user: AuthenticatedUser| async move {
                HttpResponse::Ok().body(user.0.name().to_owned())
            }),
        ))
        .await;
        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        actix_test::call_service(&app, request.to_request())
            .await
            .status()
    }

    #[rstest]
    #[case(Some("user-1"), StatusCode::OK)]
    #[case(Some("Bearer user-1"), StatusCode::OK)]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some("user-abc"), StatusCode::UNAUTHORIZED)]
    #[case(Some("user-99"), StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn tokens_resolve_or_are_unauthorised(
        #[case] header: Option<&str>,
        #[case] expected: StatusCode,
    ) {
        let harness = TestHarness::new();
        harness.register("amy").await;
        assert_eq!(call_with_header(&harness, header).await, expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn tokens_of_merged_duplicates_become_unauthorised() {
        let harness = TestHarness::new();
        let survivor = harness.store.insert_legacy_user("amy");
        let duplicate = harness.store.insert_legacy_user("Amy ");
        let duplicate_token = AccessToken::for_user(duplicate.id());
        assert_eq!(
            call_with_header(&harness, Some(duplicate_token.as_str())).await,
            StatusCode::OK
        );

        UserReconciler::new(harness.store.clone())
            .reconcile()
            .await
            .expect("sweep succeeds");

        let survivor_token = AccessToken::for_user(survivor.id());
        assert_eq!(
            call_with_header(&harness, Some(duplicate_token.as_str())).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            call_with_header(&harness, Some(survivor_token.as_str())).await,
            StatusCode::OK
        );
    }
}
