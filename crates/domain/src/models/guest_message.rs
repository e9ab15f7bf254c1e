//! Guestbook and music wish domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A guestbook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestbookEntry {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A guestbook entry ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct NewGuestbookEntry {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "E-mail address is not valid"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub message: String,

    #[serde(skip_deserializing, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl GuestbookEntry {
    pub fn from_new(id: Uuid, new: NewGuestbookEntry) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            message: new.message,
            created_at: new.created_at,
        }
    }
}

/// A song the guests would like to hear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MusicWish {
    pub id: Uuid,
    pub name: String,
    pub song: String,
    pub artist: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A music wish ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct NewMusicWish {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Song must be between 1 and 200 characters"))]
    pub song: String,

    #[validate(length(min = 1, max = 200, message = "Artist must be between 1 and 200 characters"))]
    pub artist: String,

    #[validate(length(max = 2000, message = "Message is too long"))]
    pub message: Option<String>,

    #[serde(skip_deserializing, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl MusicWish {
    pub fn from_new(id: Uuid, new: NewMusicWish) -> Self {
        Self {
            id,
            name: new.name,
            song: new.song,
            artist: new.artist,
            message: new.message,
            created_at: new.created_at,
        }
    }
}
