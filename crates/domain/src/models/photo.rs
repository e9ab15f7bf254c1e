//! Photo contribution domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable public reference to an uploaded media object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(pub String);

impl MediaRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A committed photo contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PhotoContribution {
    pub id: Uuid,
    pub media_ref: MediaRef,
    pub contributor: String,
    pub created_at: DateTime<Utc>,
}

impl PhotoContribution {
    pub fn from_new(id: Uuid, new: NewPhotoContribution) -> Self {
        Self {
            id,
            media_ref: new.media_ref,
            contributor: new.contributor,
            created_at: new.created_at,
        }
    }
}

/// A photo contribution ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewPhotoContribution {
    pub media_ref: MediaRef,
    pub contributor: String,
    pub created_at: DateTime<Utc>,
}

/// One file in a photo upload request, base64 encoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PhotoUploadFile {
    pub file_name: String,
    /// Falls back to a guess from the file name when missing.
    pub content_type: Option<String>,
    pub data_base64: String,
}

/// Request to contribute a batch of photos.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PhotoUploadRequest {
    pub contributor: Option<String>,
    pub files: Vec<PhotoUploadFile>,
}
