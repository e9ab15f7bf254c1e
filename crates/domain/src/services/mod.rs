//! Domain services for the wedding site.
//!
//! Services contain the guest-engagement logic and talk to storage only
//! through the [`Gateway`] port.

pub mod admin;
pub mod gateway;
pub mod gift_reservation;
pub mod guest_messages;
pub mod photo_pipeline;
pub mod rsvp_wizard;

pub use admin::{compute_stats, export_csv, load_csv_export, load_dashboard, load_stats};
pub use gateway::{
    list_as, BackendKind, Collection, FromRecord, Gateway, GatewayError, InMemoryGateway,
    NewRecord, OrderBy, OrderKey, Record, RecordId, ReserveOutcome, TimedGateway,
    UnconfiguredGateway,
};
pub use gift_reservation::{GiftReservationManager, ReservationError};
pub use guest_messages::{GuestMessageService, MessageError};
pub use photo_pipeline::{
    CandidateFile, FailedFile, FileState, PhotoPipeline, PipelineError, PipelineStage,
    RejectedFile, RejectionReason, StagingReport, SubmissionReport,
};
pub use rsvp_wizard::{RsvpDraft, RsvpWizard, WizardError, WizardEvent, WizardStep};
