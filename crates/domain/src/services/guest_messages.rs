//! Guestbook entries and music wishes.

use std::sync::Arc;

use chrono::Utc;
use shared::validation::validate_name;
use validator::Validate;

use super::gateway::{list_as, Gateway, GatewayError, NewRecord, OrderBy};
use crate::models::{GuestbookEntry, MusicWish, NewGuestbookEntry, NewMusicWish};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MessageError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<validator::ValidationErrors> for MessageError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.as_ref().map(|m| m.to_string()).unwrap_or_default()
                    )
                })
            })
            .collect();
        MessageError::Validation(messages.join(", "))
    }
}

impl From<validator::ValidationError> for MessageError {
    fn from(error: validator::ValidationError) -> Self {
        MessageError::Validation(
            error
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string()),
        )
    }
}

fn trimmed_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Append-only guest messages, listed newest first.
#[derive(Clone)]
pub struct GuestMessageService {
    gateway: Arc<dyn Gateway>,
}

impl GuestMessageService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn sign_guestbook(
        &self,
        entry: NewGuestbookEntry,
    ) -> Result<GuestbookEntry, MessageError> {
        let entry = NewGuestbookEntry {
            name: entry.name.trim().to_string(),
            email: trimmed_optional(entry.email),
            message: entry.message.trim().to_string(),
            created_at: Utc::now(),
        };
        validate_name(&entry.name)?;
        entry.validate()?;

        let id = self
            .gateway
            .insert(NewRecord::GuestbookEntry(entry.clone()))
            .await?;
        tracing::info!(entry_id = %id, "Guestbook signed");
        Ok(GuestbookEntry::from_new(id, entry))
    }

    pub async fn list_guestbook(&self) -> Result<Vec<GuestbookEntry>, MessageError> {
        Ok(list_as(self.gateway.as_ref(), Some(OrderBy::NEWEST_FIRST)).await?)
    }

    pub async fn add_music_wish(&self, wish: NewMusicWish) -> Result<MusicWish, MessageError> {
        let wish = NewMusicWish {
            name: wish.name.trim().to_string(),
            song: wish.song.trim().to_string(),
            artist: wish.artist.trim().to_string(),
            message: trimmed_optional(wish.message),
            created_at: Utc::now(),
        };
        validate_name(&wish.name)?;
        wish.validate()?;

        let id = self
            .gateway
            .insert(NewRecord::MusicWish(wish.clone()))
            .await?;
        tracing::info!(wish_id = %id, song = %wish.song, "Music wish added");
        Ok(MusicWish::from_new(id, wish))
    }

    pub async fn list_music_wishes(&self) -> Result<Vec<MusicWish>, MessageError> {
        Ok(list_as(self.gateway.as_ref(), Some(OrderBy::NEWEST_FIRST)).await?)
    }
}
