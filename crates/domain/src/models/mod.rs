//! Domain models for the wedding site.

pub mod event;
pub mod gift;
pub mod guest_message;
pub mod guest_response;
pub mod photo;
pub mod stats;

pub use event::{EventSettings, UploadLimits};
pub use gift::{Confirmed, GiftCatalogEntry, GiftItem, ReservationState};
pub use guest_message::{GuestbookEntry, MusicWish, NewGuestbookEntry, NewMusicWish};
pub use guest_response::{
    AttendanceChoice, AttendanceStatus, GuestResponse, NewGuestResponse, SubmitRsvpRequest,
    SubmitRsvpResponse,
};
pub use photo::{MediaRef, NewPhotoContribution, PhotoContribution};
pub use stats::{AggregateStats, DashboardSnapshot};
