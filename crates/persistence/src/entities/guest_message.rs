//! Guestbook and music wish entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{GuestbookEntry, MusicWish};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the guestbook_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct GuestbookEntryEntity {
    pub id: Uuid,
    pub event_id: String,
    pub name: String,
    pub email: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<GuestbookEntryEntity> for GuestbookEntry {
    fn from(entity: GuestbookEntryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the music_wishes table.
#[derive(Debug, Clone, FromRow)]
pub struct MusicWishEntity {
    pub id: Uuid,
    pub event_id: String,
    pub name: String,
    pub song: String,
    pub artist: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MusicWishEntity> for MusicWish {
    fn from(entity: MusicWishEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            song: entity.song,
            artist: entity.artist,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}
