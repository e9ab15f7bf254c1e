//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod gift;
pub mod guest_message;
pub mod guest_response;
pub mod photo;

pub use gift::GiftEntity;
pub use guest_message::{GuestbookEntryEntity, MusicWishEntity};
pub use guest_response::GuestResponseEntity;
pub use photo::PhotoContributionEntity;
