//! # Admin Session and Dashboard
//!
//! - `POST /v1/admin/login`     : Exchange credentials for a session (public)
//! - `POST /v1/admin/logout`    : Revoke the current session
//! - `GET  /v1/admin/stats`     : Dashboard statistics
//! - `GET  /v1/admin/export.csv`: Participant export download
//! - `POST /v1/admin/sync`      : Refetch the roster from the store
//! - `GET  /v1/admin/roster`    : Roster freshness
//!
//! Stats and exports are computed from the cached roster; `roster` reports
//! how fresh that cache is.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use accred_client::verify_admin;
use accred_core::{export_file_name, to_csv_string, DashboardStats, RosterStatus};

use crate::auth::{AdminSession, SessionToken};
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::orchestration;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Admin credentials.
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A freshly issued admin session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for `Authorization: Bearer <token>`.
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Dashboard statistics.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Totals, per-industry counts and latest check-ins.
    #[schema(value_type = Object)]
    pub stats: DashboardStats,
    /// Roster the figures were computed from.
    #[schema(value_type = Object)]
    pub roster: RosterStatus,
}

/// Roster freshness.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub version: u64,
    pub last_synced_at: Option<DateTime<Utc>>,
    /// True when never synced or last synced more than five minutes ago.
    pub stale: bool,
    pub participants: usize,
}

impl From<RosterStatus> for RosterResponse {
    fn from(s: RosterStatus) -> Self {
        Self {
            version: s.version,
            last_synced_at: s.last_synced_at,
            stale: s.stale,
            participants: s.participants,
        }
    }
}

// ---------------------------------------------------------------------------
// Routers
// ---------------------------------------------------------------------------

/// Routes reachable without a session.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/v1/admin/login", post(login))
}

/// Routes behind the session gate.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/logout", post(logout))
        .route("/v1/admin/stats", get(stats))
        .route("/v1/admin/export.csv", get(export_csv))
        .route("/v1/admin/sync", post(sync))
        .route("/v1/admin/roster", get(roster))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/admin/login: Open an admin session.
#[utoipa::path(
    post,
    path = "/v1/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "admin"
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = extract_json(body)?;
    let password = Zeroizing::new(req.password);
    let username = req.username.as_str();
    if !verify_admin(state.store.as_ref(), username, &password).await {
        tracing::warn!("admin login rejected");
        return Err(AppError::Unauthorized("invalid credentials".into()));
    }
    let (token, session) = state.sessions.issue(username, Utc::now());
    tracing::info!(username = %session.username, "admin session opened");
    Ok(Json(LoginResponse {
        token,
        username: session.username,
        expires_at: session.expires_at,
    }))
}

/// POST /v1/admin/logout: Revoke the current session.
#[utoipa::path(
    post,
    path = "/v1/admin/logout",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "No admin session", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn logout(
    State(state): State<AppState>,
    session: AdminSession,
    SessionToken(token): SessionToken,
) -> StatusCode {
    state.sessions.revoke(&token);
    tracing::info!(username = %session.username, "admin session closed");
    StatusCode::NO_CONTENT
}

/// GET /v1/admin/stats: Dashboard statistics.
#[utoipa::path(
    get,
    path = "/v1/admin/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsResponse),
        (status = 401, description = "No admin session", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let roster = state.roster.read();
    Json(StatsResponse {
        stats: DashboardStats::compute(roster.participants()),
        roster: roster.status(Utc::now()),
    })
}

/// GET /v1/admin/export.csv: Download every participant as CSV.
#[utoipa::path(
    get,
    path = "/v1/admin/export.csv",
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 401, description = "No admin session", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let csv = to_csv_string(state.roster.read().participants())?;
    let file_name = export_file_name(Utc::now().date_naive());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// POST /v1/admin/sync: Refetch the roster from the store.
#[utoipa::path(
    post,
    path = "/v1/admin/sync",
    responses(
        (status = 200, description = "Roster refreshed", body = RosterResponse),
        (status = 401, description = "No admin session", body = crate::error::ErrorBody),
        (status = 502, description = "Store unavailable", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn sync(State(state): State<AppState>) -> Result<Json<RosterResponse>, AppError> {
    let status = orchestration::sync(&state).await?;
    Ok(Json(status.into()))
}

/// GET /v1/admin/roster: Roster freshness.
#[utoipa::path(
    get,
    path = "/v1/admin/roster",
    responses(
        (status = 200, description = "Roster status", body = RosterResponse),
        (status = 401, description = "No admin session", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn roster(State(state): State<AppState>) -> Json<RosterResponse> {
    Json(state.roster_status().into())
}
