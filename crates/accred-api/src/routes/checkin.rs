//! # Check-in Desk
//!
//! - `POST /v1/admin/check-in`: Check in a typed or scanned ticket
//!
//! | Outcome                         | Status | Body                                  |
//! |---------------------------------|--------|---------------------------------------|
//! | first check-in                  | 200    | `found: true, alreadyCheckedIn: false` |
//! | repeat scan, idempotent policy  | 200    | `found: true, alreadyCheckedIn: true`  |
//! | repeat scan, reject policy      | 409    | error envelope                         |
//! | unknown or blank ticket         | 404    | error envelope                         |

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use accred_core::CheckInOutcome;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::orchestration;
use crate::routes::participants::ParticipantResponse;
use crate::state::AppState;

/// A ticket code as typed or scanned.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    /// Surrounding whitespace and letter case are ignored.
    pub ticket_id: String,
}

/// Check-in result for a known ticket.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub found: bool,
    pub already_checked_in: bool,
    pub participant: ParticipantResponse,
}

/// Build the check-in router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/admin/check-in", post(check_in))
}

/// POST /v1/admin/check-in: Check in a ticket.
#[utoipa::path(
    post,
    path = "/v1/admin/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in, or already present", body = CheckInResponse),
        (status = 401, description = "No admin session", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown ticket", body = crate::error::ErrorBody),
        (status = 409, description = "Already checked in (reject policy)", body = crate::error::ErrorBody),
        (status = 502, description = "Store unavailable", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn check_in(
    State(state): State<AppState>,
    body: Result<Json<CheckInRequest>, JsonRejection>,
) -> Result<Json<CheckInResponse>, AppError> {
    let req = extract_json(body)?;
    let outcome = orchestration::check_in(&state, &req.ticket_id).await?;
    let already_checked_in = outcome.already_checked_in();
    match outcome {
        CheckInOutcome::CheckedIn(p) | CheckInOutcome::AlreadyCheckedIn(p) => {
            Ok(Json(CheckInResponse {
                found: true,
                already_checked_in,
                participant: ParticipantResponse::from(&p),
            }))
        }
        CheckInOutcome::NotFound => Err(AppError::NotFound(format!(
            "ticket {:?} not found",
            req.ticket_id.trim()
        ))),
    }
}
