//! Gift registry routes.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::gift::{ListGiftsResponse, ReserveGiftRequest};
use domain::models::Confirmed;
use domain::services::GiftReservationManager;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/gifts
pub async fn list_gifts(
    State(state): State<AppState>,
) -> Result<Json<ListGiftsResponse>, ApiError> {
    let gifts = GiftReservationManager::new(state.gateway.clone())
        .list_gifts()
        .await?;
    Ok(Json(ListGiftsResponse { gifts }))
}

/// Reserve a gift.
///
/// POST /api/v1/gifts/:gift_id/reserve
///
/// Answers 409 with the current gift when someone else was first.
pub async fn reserve_gift(
    State(state): State<AppState>,
    Path(gift_id): Path<String>,
    Json(request): Json<ReserveGiftRequest>,
) -> Result<Json<Confirmed>, ApiError> {
    request.validate()?;

    let confirmed = GiftReservationManager::new(state.gateway.clone())
        .reserve(&gift_id, &request.reserver_name)
        .await?;
    Ok(Json(confirmed))
}
