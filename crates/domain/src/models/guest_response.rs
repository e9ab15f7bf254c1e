//! Guest response (RSVP) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Attendance status of a guest response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Pending,
    Attending,
    Declined,
}

impl AttendanceStatus {
    /// Parse a stored status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AttendanceStatus::Pending),
            "attending" => Some(AttendanceStatus::Attending),
            "declined" => Some(AttendanceStatus::Declined),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Pending => "pending",
            AttendanceStatus::Attending => "attending",
            AttendanceStatus::Declined => "declined",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The attendance answer a guest gives in the wizard.
///
/// `Pending` is not a choice a guest can make; it only exists for records
/// entered by other means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceChoice {
    Attending,
    Declined,
}

impl From<AttendanceChoice> for AttendanceStatus {
    fn from(choice: AttendanceChoice) -> Self {
        match choice {
            AttendanceChoice::Attending => AttendanceStatus::Attending,
            AttendanceChoice::Declined => AttendanceStatus::Declined,
        }
    }
}

/// A stored guest response. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: AttendanceStatus,
    /// Number of people in the party. Zero unless attending.
    pub party_size: u32,
    pub menu: Option<String>,
    pub dietary: Option<String>,
    pub song: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GuestResponse {
    /// Builds the stored form of a new response once the store assigned an id.
    pub fn from_new(id: Uuid, new: NewGuestResponse) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            status: new.status,
            party_size: new.party_size,
            menu: new.menu,
            dietary: new.dietary,
            song: new.song,
            message: new.message,
            created_at: new.created_at,
        }
    }

    pub fn is_attending(&self) -> bool {
        self.status == AttendanceStatus::Attending
    }
}

/// A guest response ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewGuestResponse {
    pub name: String,
    pub email: String,
    pub status: AttendanceStatus,
    pub party_size: u32,
    pub menu: Option<String>,
    pub dietary: Option<String>,
    pub song: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for submitting an RSVP in one call.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitRsvpRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "E-mail address is not valid"))]
    pub email: String,

    /// Explicit attendance choice. Missing means the guest did not choose.
    pub attendance: Option<AttendanceChoice>,

    /// Checked against the event's limit once attendance is known.
    pub party_size: Option<u32>,

    pub menu: Option<String>,

    #[validate(length(max = 2000, message = "Dietary note is too long"))]
    pub dietary: Option<String>,

    #[validate(length(max = 2000, message = "Song request is too long"))]
    pub song: Option<String>,

    #[validate(length(max = 2000, message = "Message is too long"))]
    pub message: Option<String>,
}

/// Response after a successful RSVP submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmitRsvpResponse {
    pub id: Uuid,
    pub status: AttendanceStatus,
    pub party_size: u32,
    pub created_at: DateTime<Utc>,
}
