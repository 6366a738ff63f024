//! # accred-api: Accreditation Portal HTTP Service
//!
//! Axum application over the participant store.
//!
//! ## API Surface
//!
//! | Prefix                     | Module                     | Access |
//! |----------------------------|----------------------------|--------|
//! | `/v1/registrations`        | [`routes::registration`]   | public |
//! | `/v1/tickets/*/badge`      | [`routes::tickets`]        | public |
//! | `/v1/catalog`              | [`routes::catalog`]        | public |
//! | `/v1/admin/login`          | [`routes::admin`]          | public |
//! | `/v1/admin/*`              | [`routes::admin`], [`routes::participants`], [`routes::checkin`] | session |
//! | `/openapi.json`            | [`openapi`]                | public |
//! | `/health/*`                | here                       | public |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware (admin routes only) → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod orchestration;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};

use crate::middleware::metrics::{ApiMetrics, MetricsSnapshot};

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Request body cap. Registration forms are a few kilobytes.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes are mounted outside the metrics and auth middleware.
pub fn app(state: AppState) -> Router {
    let admin = Router::new()
        .merge(routes::participants::router())
        .merge(routes::checkin::router())
        .merge(routes::admin::router())
        .route_layer(from_fn(auth::auth_middleware));

    let api = Router::new()
        .merge(routes::registration::router())
        .merge(routes::tickets::router())
        .merge(routes::catalog::router())
        .merge(routes::admin::public_router())
        .merge(openapi::router())
        .merge(admin)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(Extension(state.sessions.clone()))
        .layer(Extension(state.metrics.clone()))
        .layer(middleware::tracing_layer::layer())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/health/metrics", get(metrics))
        .layer(Extension(state.metrics.clone()))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 503 until the roster has been synced at least once.
async fn readiness(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    if state.roster.read().last_synced_at().is_none() {
        return (StatusCode::SERVICE_UNAVAILABLE, "roster not synced").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}

/// In-process counters.
async fn metrics(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}
