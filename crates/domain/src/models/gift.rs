//! Gift registry domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reservation state of a gift. The reserver is present iff reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReservationState {
    Available,
    Reserved {
        reserved_by: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reserved_at: Option<DateTime<Utc>>,
    },
}

/// A gift listed by the couple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GiftItem {
    pub id: String,
    pub name: String,
    pub price: Option<String>,
    pub emoji: Option<String>,
    pub reservation: ReservationState,
}

impl GiftItem {
    /// Create an available gift.
    pub fn available(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: None,
            emoji: None,
            reservation: ReservationState::Available,
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self.reservation, ReservationState::Reserved { .. })
    }

    pub fn reserved_by(&self) -> Option<&str> {
        match &self.reservation {
            ReservationState::Reserved { reserved_by, .. } => Some(reserved_by),
            ReservationState::Available => None,
        }
    }
}

/// A gift definition from event configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Request to reserve a gift.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ReserveGiftRequest {
    #[validate(length(min = 1, max = 100, message = "Reserver name must be between 1 and 100 characters"))]
    pub reserver_name: String,
}

/// Successful reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Confirmed {
    pub gift: GiftItem,
}

/// Response for listing gifts.
#[derive(Debug, Clone, Serialize)]
pub struct ListGiftsResponse {
    pub gifts: Vec<GiftItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_gift() {
        let gift = GiftItem::available("gift-7", "Espresso machine").with_price("299€");
        assert!(!gift.is_reserved());
        assert_eq!(gift.reserved_by(), None);
        assert_eq!(gift.price.as_deref(), Some("299€"));
    }

    #[test]
    fn test_reserved_gift() {
        let gift = GiftItem {
            reservation: ReservationState::Reserved {
                reserved_by: "Guest A".to_string(),
                reserved_at: None,
            },
            ..GiftItem::available("gift-7", "Espresso machine")
        };
        assert!(gift.is_reserved());
        assert_eq!(gift.reserved_by(), Some("Guest A"));
    }

    #[test]
    fn test_reservation_state_serialization() {
        let json = serde_json::to_string(&ReservationState::Available).unwrap();
        assert_eq!(json, r#"{"state":"available"}"#);

        let reserved = ReservationState::Reserved {
            reserved_by: "Tom".to_string(),
            reserved_at: None,
        };
        let json = serde_json::to_string(&reserved).unwrap();
        assert_eq!(json, r#"{"state":"reserved","reserved_by":"Tom"}"#);
    }

    #[test]
    fn test_reserve_request_validation() {
        let ok = ReserveGiftRequest {
            reserver_name: "Familie Müller".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = ReserveGiftRequest {
            reserver_name: String::new(),
        };
        assert!(empty.validate().is_err());
    }
}
