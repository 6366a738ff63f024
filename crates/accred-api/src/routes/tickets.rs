//! # Badge Lookup
//!
//! - `GET /v1/tickets/:ticket_id/badge`: Badge data for a ticket
//!
//! Public: the ticket code itself is the credential a participant holds.
//! The lookup goes to the store, not the roster, so a badge is available
//! right after registration on any instance.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use accred_core::TicketId;

use crate::error::AppError;
use crate::state::AppState;

/// Everything printed on a badge.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub ticket_id: String,
    pub full_name: String,
    pub company: String,
    pub job_title: String,
    pub welcome_message: Option<String>,
    pub qr_code_url: String,
}

/// Build the badge router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/tickets/:ticket_id/badge", get(get_badge))
}

/// GET /v1/tickets/:ticket_id/badge: Badge data.
#[utoipa::path(
    get,
    path = "/v1/tickets/{ticket_id}/badge",
    params(("ticket_id" = String, Path, description = "Ticket code, case-insensitive")),
    responses(
        (status = 200, description = "Badge data", body = BadgeResponse),
        (status = 404, description = "Unknown ticket", body = crate::error::ErrorBody),
        (status = 502, description = "Store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "registration"
)]
pub async fn get_badge(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<BadgeResponse>, AppError> {
    let not_found = || AppError::NotFound(format!("ticket {} not found", ticket_id.trim()));
    let ticket = TicketId::normalize(&ticket_id).map_err(|_| not_found())?;
    let participant = state
        .store
        .find_by_ticket(&ticket)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(BadgeResponse {
        qr_code_url: state.qr.image_url(&participant.ticket_id).to_string(),
        ticket_id: participant.ticket_id.to_string(),
        full_name: participant.full_name(),
        company: participant.company,
        job_title: participant.job_title,
        welcome_message: participant.welcome_message,
    }))
}
