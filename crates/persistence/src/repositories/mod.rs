//! Repository implementations for database operations.
//!
//! Every repository is bound to one event and only sees that event's rows.

pub mod gift;
pub mod guest_message;
pub mod guest_response;
pub mod photo;

pub use gift::{GiftRepository, ReserveResult};
pub use guest_message::GuestMessageRepository;
pub use guest_response::GuestResponseRepository;
pub use photo::PhotoRepository;

use domain::services::{OrderBy, OrderKey};

/// Builds an ORDER BY clause. `name_column` is the column used for name
/// ordering. `id` breaks ties so listings are stable.
pub(crate) fn order_clause(order: Option<OrderBy>, name_column: &str) -> String {
    let order = order.unwrap_or(OrderBy::OLDEST_FIRST);
    let column = match order.key {
        OrderKey::CreatedAt => "created_at",
        OrderKey::Name => name_column,
    };
    let direction = if order.descending { "DESC" } else { "ASC" };
    format!("ORDER BY {} {}, id {}", column, direction, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause() {
        assert_eq!(
            order_clause(Some(OrderBy::NEWEST_FIRST), "name"),
            "ORDER BY created_at DESC, id DESC"
        );
        assert_eq!(
            order_clause(Some(OrderBy::BY_NAME), "lower(name)"),
            "ORDER BY lower(name) ASC, id ASC"
        );
        assert_eq!(order_clause(None, "name"), "ORDER BY created_at ASC, id ASC");
    }
}
