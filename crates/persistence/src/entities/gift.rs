//! Gift entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{GiftItem, ReservationState};
use sqlx::FromRow;

/// Database row mapping for the gifts table.
#[derive(Debug, Clone, FromRow)]
pub struct GiftEntity {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub price: Option<String>,
    pub emoji: Option<String>,
    pub reserved: bool,
    pub reserved_by: Option<String>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<GiftEntity> for GiftItem {
    fn from(entity: GiftEntity) -> Self {
        // reserved_by is non-null exactly when reserved (table constraint).
        let reservation = match entity.reserved_by.filter(|_| entity.reserved) {
            Some(reserved_by) => ReservationState::Reserved {
                reserved_by,
                reserved_at: entity.reserved_at,
            },
            None => ReservationState::Available,
        };
        Self {
            id: entity.id,
            name: entity.name,
            price: entity.price,
            emoji: entity.emoji,
            reservation,
        }
    }
}
