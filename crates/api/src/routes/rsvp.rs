//! RSVP submission.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::guest_response::{SubmitRsvpRequest, SubmitRsvpResponse};
use domain::services::RsvpWizard;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_rsvp_submitted;

/// Submit a complete RSVP.
///
/// POST /api/v1/rsvp
///
/// Runs the wizard end to end: every step guard applies, then a single
/// insert creates the response.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Json(request): Json<SubmitRsvpRequest>,
) -> Result<(StatusCode, Json<SubmitRsvpResponse>), ApiError> {
    request.validate()?;

    let mut wizard = RsvpWizard::with_draft(state.config.event.settings(), request.into());
    wizard.advance()?;
    wizard.advance()?;
    wizard.submit(state.gateway.as_ref()).await?;

    let receipt = wizard
        .receipt()
        .ok_or_else(|| ApiError::Internal("RSVP stored without a receipt".to_string()))?;
    record_rsvp_submitted(receipt.status.as_str());

    Ok((
        StatusCode::CREATED,
        Json(SubmitRsvpResponse {
            id: receipt.id,
            status: receipt.status,
            party_size: receipt.party_size,
            created_at: receipt.created_at,
        }),
    ))
}
