//! Photo contribution entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{MediaRef, PhotoContribution};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the photo_contributions table.
#[derive(Debug, Clone, FromRow)]
pub struct PhotoContributionEntity {
    pub id: Uuid,
    pub event_id: String,
    pub media_ref: String,
    pub contributor: String,
    pub created_at: DateTime<Utc>,
}

impl From<PhotoContributionEntity> for PhotoContribution {
    fn from(entity: PhotoContributionEntity) -> Self {
        Self {
            id: entity.id,
            media_ref: MediaRef(entity.media_ref),
            contributor: entity.contributor,
            created_at: entity.created_at,
        }
    }
}
