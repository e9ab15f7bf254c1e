//! Guest response entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AttendanceStatus, GuestResponse};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the guest_responses table.
#[derive(Debug, Clone, FromRow)]
pub struct GuestResponseEntity {
    pub id: Uuid,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub status: String,
    pub party_size: i32,
    pub menu: Option<String>,
    pub dietary: Option<String>,
    pub song: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<GuestResponseEntity> for GuestResponse {
    fn from(entity: GuestResponseEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            // The column carries a CHECK constraint on the three statuses.
            status: AttendanceStatus::parse(&entity.status).unwrap_or(AttendanceStatus::Pending),
            party_size: entity.party_size.max(0) as u32,
            menu: entity.menu,
            dietary: entity.dietary,
            song: entity.song,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_domain() {
        let entity = GuestResponseEntity {
            id: Uuid::new_v4(),
            event_id: "sophie-max-2025".to_string(),
            name: "Anna K.".to_string(),
            email: "anna@example.com".to_string(),
            status: "attending".to_string(),
            party_size: 2,
            menu: Some("vegetarian".to_string()),
            dietary: None,
            song: None,
            message: None,
            created_at: Utc::now(),
        };
        let response: GuestResponse = entity.clone().into();
        assert_eq!(response.id, entity.id);
        assert_eq!(response.status, AttendanceStatus::Attending);
        assert_eq!(response.party_size, 2);
        assert_eq!(response.menu.as_deref(), Some("vegetarian"));
    }
}
