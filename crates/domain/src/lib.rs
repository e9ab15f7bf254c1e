//! Domain layer for the wedding site backend.
//!
//! This crate contains:
//! - Domain models (guest responses, gifts, photo contributions, guest messages)
//! - The persistence gateway port and its in-process implementations
//! - Guest-facing services (RSVP wizard, gift reservation, photo pipeline)
//! - Host-facing aggregation and CSV export

pub mod models;
pub mod services;
