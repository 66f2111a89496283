//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, their
//! request and response schemas, and the `Authorization` header scheme used by
//! the admin routes. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::admin::{DashboardResponse, ReconciliationResponse};
use crate::inbound::http::dto::{
    MessageResponse, RatingResponse, RatingWithTeaResponse, TeaResponse, UserResponse,
};
use crate::inbound::http::ratings::RatingRequest;
use crate::inbound::http::summary::{AveragesResponse, SummaryResponse};
use crate::inbound::http::teas::{DropResponse, TeaRequest};
use crate::inbound::http::users::{LoginResponse, NameRequest, RegisterResponse};

/// Name of the token security scheme.
pub const TOKEN_SCHEME: &str = "UserToken";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`user-<id>` token from registration or login, optionally prefixed by `Bearer `.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Teahouse API",
        description = "Tea catalogue, flavour ratings and aggregate summaries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::list_user_ratings,
        crate::inbound::http::teas::list_teas,
        crate::inbound::http::teas::register_tea,
        crate::inbound::http::teas::drop_teas,
        crate::inbound::http::teas::seed_teas,
        crate::inbound::http::ratings::submit_rating,
        crate::inbound::http::ratings::list_ratings,
        crate::inbound::http::ratings::edit_rating,
        crate::inbound::http::ratings::delete_rating,
        crate::inbound::http::summary::rating_summary,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::admin::reconcile_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        MessageResponse,
        UserResponse,
        NameRequest,
        RegisterResponse,
        LoginResponse,
        TeaRequest,
        TeaResponse,
        DropResponse,
        RatingRequest,
        RatingResponse,
        RatingWithTeaResponse,
        AveragesResponse,
        SummaryResponse,
        DashboardResponse,
        ReconciliationResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and user lookups"),
        (name = "teas", description = "Tea catalogue"),
        (name = "ratings", description = "Flavour ratings"),
        (name = "summary", description = "Aggregate statistics"),
        (name = "admin", description = "Operations restricted to the admin user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("TeaResponse", "display")]
    #[case("RatingResponse", "teaId")]
    #[case("SummaryResponse", "ratingsCount")]
    fn schemas_expose_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/api/v1/teas")]
    #[case("/api/v1/ratings/{id}")]
    #[case("/api/v1/summary")]
    #[case("/api/v1/admin/reconcile-users")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn token_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(TOKEN_SCHEME));
    }
}
