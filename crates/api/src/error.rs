use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::GiftItem;
use domain::services::{GatewayError, MessageError, PipelineError, ReservationError, WizardError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Lost a reservation race. Carries the gift as it is now.
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        current: Option<GiftItem>,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<GiftItem>,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut details = None;
        let mut current = None;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict {
                message,
                current: gift,
            } => {
                current = gift;
                (StatusCode::CONFLICT, "conflict", message)
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::InvalidField { field, message } => {
                details = Some(vec![ValidationDetail {
                    field,
                    message: message.clone(),
                }]);
                (StatusCode::BAD_REQUEST, "validation_error", message)
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "timeout", msg),
            ApiError::BadGateway(msg) => {
                tracing::error!(error = %msg, "Backend call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "backend_error",
                    "The storage backend reported an error".into(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
            current,
        };

        (status, Json(body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unconfigured(_) => ApiError::ServiceUnavailable(err.to_string()),
            GatewayError::Timeout(_) => ApiError::GatewayTimeout(err.to_string()),
            GatewayError::NotFound(what) => ApiError::NotFound(what),
            GatewayError::Backend(msg) => ApiError::BadGateway(msg),
        }
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Validation { field, message } => ApiError::InvalidField {
                field: field.to_string(),
                message,
            },
            WizardError::InvalidTransition { .. } | WizardError::AlreadySubmitted => {
                ApiError::Validation(err.to_string())
            }
            WizardError::Gateway(e) => e.into(),
        }
    }
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::Validation(msg) => ApiError::Validation(msg),
            ReservationError::Conflict { current } => ApiError::Conflict {
                message: format!("Gift '{}' is already reserved", current.name),
                current: Some(current),
            },
            ReservationError::NotFound(what) => ApiError::NotFound(what),
            ReservationError::Gateway(e) => e.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::ContributorRequired => ApiError::InvalidField {
                field: "contributor".to_string(),
                message: err.to_string(),
            },
            PipelineError::InvalidContributor(message) => ApiError::InvalidField {
                field: "contributor".to_string(),
                message,
            },
            PipelineError::NothingStaged | PipelineError::UnknownFile(_) => {
                ApiError::Validation(err.to_string())
            }
            PipelineError::Gateway(e) => e.into(),
        }
    }
}

impl From<MessageError> for ApiError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::Validation(msg) => ApiError::Validation(msg),
            MessageError::Gateway(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
                })
            })
            .collect();

        match details.as_slice() {
            [single] => ApiError::InvalidField {
                field: single.field.clone(),
                message: single.message.clone(),
            },
            _ => ApiError::Validation(format!("{} validation errors", details.len())),
        }
    }
}
