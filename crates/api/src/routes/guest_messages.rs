//! Guestbook and music wish routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{GuestbookEntry, MusicWish, NewGuestbookEntry, NewMusicWish};
use domain::services::GuestMessageService;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_guest_message;

#[derive(Debug, Serialize)]
pub struct ListGuestbookResponse {
    pub entries: Vec<GuestbookEntry>,
}

#[derive(Debug, Serialize)]
pub struct ListMusicWishesResponse {
    pub wishes: Vec<MusicWish>,
}

/// GET /api/v1/guestbook
pub async fn list_guestbook(
    State(state): State<AppState>,
) -> Result<Json<ListGuestbookResponse>, ApiError> {
    let entries = GuestMessageService::new(state.gateway.clone())
        .list_guestbook()
        .await?;
    Ok(Json(ListGuestbookResponse { entries }))
}

/// POST /api/v1/guestbook
pub async fn sign_guestbook(
    State(state): State<AppState>,
    Json(entry): Json<NewGuestbookEntry>,
) -> Result<(StatusCode, Json<GuestbookEntry>), ApiError> {
    let stored = GuestMessageService::new(state.gateway.clone())
        .sign_guestbook(entry)
        .await?;
    record_guest_message("guestbook");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/v1/music-wishes
pub async fn list_music_wishes(
    State(state): State<AppState>,
) -> Result<Json<ListMusicWishesResponse>, ApiError> {
    let wishes = GuestMessageService::new(state.gateway.clone())
        .list_music_wishes()
        .await?;
    Ok(Json(ListMusicWishesResponse { wishes }))
}

/// POST /api/v1/music-wishes
pub async fn add_music_wish(
    State(state): State<AppState>,
    Json(wish): Json<NewMusicWish>,
) -> Result<(StatusCode, Json<MusicWish>), ApiError> {
    let stored = GuestMessageService::new(state.gateway.clone())
        .add_music_wish(wish)
        .await?;
    record_guest_message("music_wish");
    Ok((StatusCode::CREATED, Json(stored)))
}
