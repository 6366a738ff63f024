//! # Participant Administration
//!
//! - `GET    /v1/admin/participants`    : Filtered roster listing
//! - `DELETE /v1/admin/participants/:id`: Remove a participant
//!
//! Listings are served from the cached roster. Deletion goes to the store
//! first and only then leaves the roster.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use accred_core::{InterestType, Participant, ParticipantFilter, ParticipantId, PresenceStatus};

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::orchestration;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// A participant as shown to admins.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub ticket_id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
    pub industry: String,
    /// `services`, `formations` or `none`.
    pub interest_type: String,
    pub selected_offerings: Vec<String>,
    pub opinion: String,
    pub referral_forum: Vec<String>,
    pub referral_assirou: Vec<String>,
    pub registered_at: DateTime<Utc>,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub welcome_message: Option<String>,
}

impl From<&Participant> for ParticipantResponse {
    fn from(p: &Participant) -> Self {
        Self {
            id: *p.id.as_uuid(),
            ticket_id: p.ticket_id.to_string(),
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            full_name: p.full_name(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            company: p.company.clone(),
            job_title: p.job_title.clone(),
            industry: p.industry.clone(),
            interest_type: p.interest_type.as_str().to_string(),
            selected_offerings: p.selected_offerings.iter().cloned().collect(),
            opinion: p.opinion.clone(),
            referral_forum: p.referral_forum.iter().cloned().collect(),
            referral_assirou: p.referral_assirou.iter().cloned().collect(),
            registered_at: p.registered_at,
            checked_in: p.checked_in(),
            checked_in_at: p.checked_in_at(),
            welcome_message: p.welcome_message.clone(),
        }
    }
}

/// Query parameters for the participant listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring of name, email, company or ticket.
    pub query: Option<String>,
    /// `present` or `absent`.
    #[param(value_type = Option<String>)]
    pub status: Option<PresenceStatus>,
    /// `services`, `formations` or `none`.
    #[param(value_type = Option<String>)]
    pub interest: Option<InterestType>,
}

impl From<ListParams> for ParticipantFilter {
    fn from(params: ListParams) -> Self {
        Self {
            query: params.query,
            status: params.status,
            interest: params.interest,
        }
    }
}

/// Filtered participant listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantListResponse {
    /// Matching participants, newest registration first.
    pub participants: Vec<ParticipantResponse>,
    /// Number of matches.
    pub total: usize,
    /// Roster version the listing was taken from.
    pub roster_version: u64,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the participant administration router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/participants", get(list_participants))
        .route("/v1/admin/participants/:id", delete(delete_participant))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/admin/participants: List participants from the roster.
#[utoipa::path(
    get,
    path = "/v1/admin/participants",
    params(ListParams),
    responses(
        (status = 200, description = "Matching participants", body = ParticipantListResponse),
        (status = 400, description = "Malformed query", body = crate::error::ErrorBody),
        (status = 401, description = "No admin session", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ParticipantListResponse>, AppError> {
    let filter = ParticipantFilter::from(extract_query(params)?);
    let roster = state.roster.read();
    let participants: Vec<ParticipantResponse> = filter
        .apply(roster.participants())
        .into_iter()
        .map(ParticipantResponse::from)
        .collect();
    Ok(Json(ParticipantListResponse {
        total: participants.len(),
        participants,
        roster_version: roster.version(),
    }))
}

/// DELETE /v1/admin/participants/:id: Delete a participant.
#[utoipa::path(
    delete,
    path = "/v1/admin/participants/{id}",
    params(("id" = Uuid, Path, description = "Participant UUID")),
    responses(
        (status = 204, description = "Participant deleted"),
        (status = 401, description = "No admin session", body = crate::error::ErrorBody),
        (status = 404, description = "Participant not found", body = crate::error::ErrorBody),
        (status = 502, description = "Store unavailable", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    orchestration::delete_participant(&state, ParticipantId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
