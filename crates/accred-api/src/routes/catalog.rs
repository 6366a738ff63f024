//! `GET /v1/catalog`: option lists for the registration form.

use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use accred_core::Catalog;

use crate::state::AppState;

/// Option lists offered by the registration form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub industries: Vec<String>,
    pub services: Vec<String>,
    pub formations: Vec<String>,
    pub referral_sources: Vec<String>,
}

impl From<Catalog> for CatalogResponse {
    fn from(c: Catalog) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            industries: owned(c.industries),
            services: owned(c.services),
            formations: owned(c.formations),
            referral_sources: owned(c.referral_sources),
        }
    }
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/catalog", get(get_catalog))
}

/// GET /v1/catalog: Event catalog.
#[utoipa::path(
    get,
    path = "/v1/catalog",
    responses((status = 200, description = "Event catalog", body = CatalogResponse)),
    tag = "registration"
)]
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(Catalog::current().into())
}
