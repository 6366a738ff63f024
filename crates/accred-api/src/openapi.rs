//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the admin session bearer scheme to the spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Admin session token issued by POST /v1/admin/login.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the portal API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accreditation Portal API",
        description = "Participant registration, badges, and the admin check-in desk.\n\nAdmin endpoints require `Authorization: Bearer <token>` from `POST /v1/admin/login`. Registration, badges, the catalog and health probes are public.",
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::registration::submit_registration,
        crate::routes::tickets::get_badge,
        crate::routes::catalog::get_catalog,
        crate::routes::admin::login,
        crate::routes::admin::logout,
        crate::routes::admin::stats,
        crate::routes::admin::export_csv,
        crate::routes::admin::sync,
        crate::routes::admin::roster,
        crate::routes::participants::list_participants,
        crate::routes::participants::delete_participant,
        crate::routes::checkin::check_in,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::registration::RegistrationRequest,
        crate::routes::registration::RegistrationResponse,
        crate::routes::participants::ParticipantResponse,
        crate::routes::participants::ParticipantListResponse,
        crate::routes::tickets::BadgeResponse,
        crate::routes::catalog::CatalogResponse,
        crate::routes::admin::LoginRequest,
        crate::routes::admin::LoginResponse,
        crate::routes::admin::StatsResponse,
        crate::routes::admin::RosterResponse,
        crate::routes::checkin::CheckInRequest,
        crate::routes::checkin::CheckInResponse,
        crate::middleware::metrics::MetricsSnapshot,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "registration", description = "Public registration and badges"),
        (name = "admin", description = "Admin session, roster and check-in desk"),
    )
)]
pub struct ApiDoc;

/// Router serving the generated spec.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
