//! HTTP route handlers.

pub mod admin;
pub mod gifts;
pub mod guest_messages;
pub mod health;
pub mod photos;
pub mod rsvp;
