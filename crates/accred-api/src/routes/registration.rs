//! # Public Registration
//!
//! - `POST /v1/registrations`: Submit the registration form
//!
//! Returns the stored participant with its ticket, welcome message and QR
//! image link. An invalid form returns 422 and nothing is stored.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use accred_core::{InterestType, RegistrationForm, Salutation};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::orchestration;
use crate::routes::participants::ParticipantResponse;
use crate::state::AppState;

/// Registration form as submitted by the browser.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationRequest {
    /// `M.` or `Mme`.
    #[schema(value_type = String)]
    pub salutation: Salutation,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
    pub industry: String,
    /// `services`, `formations` or `none`.
    #[schema(value_type = String)]
    pub interest_type: InterestType,
    pub selected_offerings: Vec<String>,
    pub opinion: String,
    pub referral_forum: Vec<String>,
    pub referral_assirou: Vec<String>,
}

impl From<RegistrationRequest> for RegistrationForm {
    fn from(req: RegistrationRequest) -> Self {
        Self {
            salutation: req.salutation,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            company: req.company,
            job_title: req.job_title,
            industry: req.industry,
            interest_type: req.interest_type,
            selected_offerings: req.selected_offerings.into_iter().collect(),
            opinion: req.opinion,
            referral_forum: req.referral_forum.into_iter().collect(),
            referral_assirou: req.referral_assirou.into_iter().collect(),
        }
    }
}

/// A completed registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub participant: ParticipantResponse,
    /// QR image encoding the ticket code.
    pub qr_code_url: String,
}

/// Build the registration router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/registrations", post(submit_registration))
}

/// POST /v1/registrations: Register a participant.
#[utoipa::path(
    post,
    path = "/v1/registrations",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Participant registered", body = RegistrationResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid form", body = crate::error::ErrorBody),
        (status = 502, description = "Store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "registration"
)]
pub async fn submit_registration(
    State(state): State<AppState>,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    let req = extract_json(body)?;
    let participant = orchestration::register(&state, req.into()).await?;
    let qr_code_url = state.qr.image_url(&participant.ticket_id).to_string();
    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            participant: ParticipantResponse::from(&participant),
            qr_code_url,
        }),
    ))
}
