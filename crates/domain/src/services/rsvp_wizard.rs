//! RSVP wizard: a multi-step form controller for one guest response.
//!
//! The wizard is a tagged state machine. [`transition`] is pure and decides
//! whether a step change is allowed; [`RsvpWizard`] owns the draft and the
//! current step and performs the single gateway insert on submission.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::validation::{
    validate_contact_email, validate_free_text, validate_name, validate_party_size,
};
use validator::ValidationError;

use super::gateway::{Gateway, GatewayError, NewRecord, RecordId};
use crate::models::{
    AttendanceChoice, AttendanceStatus, EventSettings, GuestResponse, NewGuestResponse,
    SubmitRsvpRequest,
};

/// Values entered so far. Nothing here is persisted until submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RsvpDraft {
    pub name: String,
    pub email: String,
    pub attendance: Option<AttendanceChoice>,
    pub party_size: Option<u32>,
    pub menu: Option<String>,
    pub dietary: Option<String>,
    pub song: Option<String>,
    pub message: Option<String>,
}

impl From<SubmitRsvpRequest> for RsvpDraft {
    fn from(req: SubmitRsvpRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            attendance: req.attendance,
            party_size: req.party_size,
            menu: req.menu,
            dietary: req.dietary,
            song: req.song,
            message: req.message,
        }
    }
}

/// Wizard steps.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    Info,
    Details,
    Finish,
    /// Submission reached the store but failed. Retryable.
    Pending { error: GatewayError },
    Submitted { id: RecordId, status: AttendanceStatus },
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::Info => "info",
            WizardStep::Details => "details",
            WizardStep::Finish => "finish",
            WizardStep::Pending { .. } => "pending",
            WizardStep::Submitted { .. } => "submitted",
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, WizardStep::Submitted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Advance,
    Back,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Cannot {action} from the {step} step")]
    InvalidTransition {
        step: &'static str,
        action: &'static str,
    },

    #[error("This response has already been submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl WizardError {
    fn field(field: &'static str, err: ValidationError) -> Self {
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string());
        WizardError::Validation { field, message }
    }
}

/// Decides the next step for `event`, validating the draft where a guard
/// applies. Never touches the gateway.
pub fn transition(
    step: &WizardStep,
    draft: &RsvpDraft,
    event: WizardEvent,
    settings: &EventSettings,
) -> Result<WizardStep, WizardError> {
    match (step, event) {
        (WizardStep::Info, WizardEvent::Advance) => {
            validate_info(draft)?;
            Ok(WizardStep::Details)
        }
        (WizardStep::Details, WizardEvent::Advance) => {
            validate_details(draft, settings)?;
            Ok(WizardStep::Finish)
        }
        (WizardStep::Details, WizardEvent::Back) => Ok(WizardStep::Info),
        (WizardStep::Finish, WizardEvent::Back)
        | (WizardStep::Pending { .. }, WizardEvent::Back) => Ok(WizardStep::Details),
        (WizardStep::Submitted { .. }, _) => Err(WizardError::AlreadySubmitted),
        (step, event) => Err(WizardError::InvalidTransition {
            step: step.name(),
            action: match event {
                WizardEvent::Advance => "advance",
                WizardEvent::Back => "go back",
            },
        }),
    }
}

fn validate_info(draft: &RsvpDraft) -> Result<AttendanceChoice, WizardError> {
    validate_name(&draft.name).map_err(|e| WizardError::field("name", e))?;
    validate_contact_email(&draft.email).map_err(|e| WizardError::field("email", e))?;
    draft.attendance.ok_or_else(|| WizardError::Validation {
        field: "attendance",
        message: "Please tell us whether you will attend".to_string(),
    })
}

fn validate_details(draft: &RsvpDraft, settings: &EventSettings) -> Result<(), WizardError> {
    validate_free_text(draft.dietary.as_deref()).map_err(|e| WizardError::field("dietary", e))?;
    validate_free_text(draft.song.as_deref()).map_err(|e| WizardError::field("song", e))?;
    validate_free_text(draft.message.as_deref()).map_err(|e| WizardError::field("message", e))?;

    if draft.attendance != Some(AttendanceChoice::Attending) {
        return Ok(());
    }

    validate_party_size(draft.party_size.unwrap_or(1), settings.max_party_size)
        .map_err(|e| WizardError::field("party_size", e))?;

    if settings.has_menu() {
        let choice = non_blank(&draft.menu).ok_or_else(|| WizardError::Validation {
            field: "menu",
            message: "Please choose a menu".to_string(),
        })?;
        if settings.find_menu_option(&choice).is_none() {
            return Err(WizardError::Validation {
                field: "menu",
                message: format!("Unknown menu option '{}'", choice),
            });
        }
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Builds the immutable record from a draft that passed every guard.
///
/// Declined responses carry no party size and no menu.
pub fn build_response(
    draft: &RsvpDraft,
    settings: &EventSettings,
) -> Result<NewGuestResponse, WizardError> {
    let choice = validate_info(draft)?;
    validate_details(draft, settings)?;

    let (party_size, menu) = match choice {
        AttendanceChoice::Attending => {
            let menu = if settings.has_menu() {
                non_blank(&draft.menu)
                    .and_then(|m| settings.find_menu_option(&m).map(str::to_string))
            } else {
                None
            };
            (draft.party_size.unwrap_or(1), menu)
        }
        AttendanceChoice::Declined => (0, None),
    };

    Ok(NewGuestResponse {
        name: draft.name.trim().to_string(),
        email: draft.email.trim().to_string(),
        status: choice.into(),
        party_size,
        menu,
        dietary: non_blank(&draft.dietary),
        song: non_blank(&draft.song),
        message: non_blank(&draft.message),
        created_at: Utc::now(),
    })
}

/// One guest's wizard session.
#[derive(Debug, Clone)]
pub struct RsvpWizard {
    settings: EventSettings,
    draft: RsvpDraft,
    step: WizardStep,
    receipt: Option<GuestResponse>,
}

impl RsvpWizard {
    pub fn new(settings: EventSettings) -> Self {
        Self::with_draft(settings, RsvpDraft::default())
    }

    pub fn with_draft(settings: EventSettings, draft: RsvpDraft) -> Self {
        Self {
            settings,
            draft,
            step: WizardStep::Info,
            receipt: None,
        }
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn draft(&self) -> &RsvpDraft {
        &self.draft
    }

    /// The stored response, once submitted.
    pub fn receipt(&self) -> Option<&GuestResponse> {
        self.receipt.as_ref()
    }

    /// Change the draft. Rejected once the response was submitted.
    pub fn edit(&mut self, f: impl FnOnce(&mut RsvpDraft)) -> Result<(), WizardError> {
        if self.step.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        f(&mut self.draft);
        Ok(())
    }

    pub fn advance(&mut self) -> Result<&WizardStep, WizardError> {
        self.apply(WizardEvent::Advance)
    }

    pub fn back(&mut self) -> Result<&WizardStep, WizardError> {
        self.apply(WizardEvent::Back)
    }

    fn apply(&mut self, event: WizardEvent) -> Result<&WizardStep, WizardError> {
        match transition(&self.step, &self.draft, event, &self.settings) {
            Ok(next) => {
                tracing::debug!(from = self.step.name(), to = next.name(), "RSVP wizard step");
                self.step = next;
                Ok(&self.step)
            }
            Err(e) => {
                if let WizardError::Validation { field, .. } = &e {
                    tracing::warn!(
                        field = field,
                        step = self.step.name(),
                        "RSVP step blocked by validation"
                    );
                }
                Err(e)
            }
        }
    }

    /// Submit the response with exactly one gateway insert.
    ///
    /// Allowed from `Finish` and from `Pending`. An unconfigured backend
    /// leaves the step untouched; any other gateway failure moves the wizard
    /// to `Pending` so the guest can retry with the same data.
    pub async fn submit(&mut self, gateway: &dyn Gateway) -> Result<RecordId, WizardError> {
        match &self.step {
            WizardStep::Finish | WizardStep::Pending { .. } => {}
            WizardStep::Submitted { .. } => return Err(WizardError::AlreadySubmitted),
            other => {
                return Err(WizardError::InvalidTransition {
                    step: other.name(),
                    action: "submit",
                })
            }
        }

        let record = build_response(&self.draft, &self.settings)?;
        let status = record.status;

        match gateway.insert(NewRecord::GuestResponse(record.clone())).await {
            Ok(id) => {
                tracing::info!(response_id = %id, status = %status, "RSVP submitted");
                self.step = WizardStep::Submitted { id, status };
                self.receipt = Some(GuestResponse::from_new(id, record));
                Ok(id)
            }
            Err(e) if e.is_unconfigured() => {
                tracing::warn!(error = %e, "RSVP not submitted, backend unconfigured");
                Err(e.into())
            }
            Err(e) => {
                tracing::error!(error = %e, "RSVP submission failed");
                self.step = WizardStep::Pending { error: e.clone() };
                Err(e.into())
            }
        }
    }
}
