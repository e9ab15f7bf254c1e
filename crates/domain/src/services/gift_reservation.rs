//! Gift reservation: one exclusive claim per gift.

use std::sync::Arc;

use shared::validation::validate_name;

use super::gateway::{list_as, Gateway, GatewayError, OrderBy, ReserveOutcome};
use crate::models::{Confirmed, GiftItem};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReservationError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another guest got there first. Carries the current state.
    #[error("Gift '{}' is already reserved", .current.id)]
    Conflict { current: GiftItem },

    #[error("Gift not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Gateway(GatewayError),
}

impl From<GatewayError> for ReservationError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(what) => ReservationError::NotFound(what),
            other => ReservationError::Gateway(other),
        }
    }
}

/// Lists the gift catalogue and reserves gifts through the gateway.
#[derive(Clone)]
pub struct GiftReservationManager {
    gateway: Arc<dyn Gateway>,
}

impl GiftReservationManager {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// All gifts ordered by name.
    pub async fn list_gifts(&self) -> Result<Vec<GiftItem>, GatewayError> {
        list_as(self.gateway.as_ref(), Some(OrderBy::BY_NAME)).await
    }

    /// Reserve `gift_id` for `reserver_name`.
    ///
    /// The conditional write happens at the store; a losing caller gets
    /// [`ReservationError::Conflict`] and is never retried here.
    pub async fn reserve(
        &self,
        gift_id: &str,
        reserver_name: &str,
    ) -> Result<Confirmed, ReservationError> {
        validate_name(reserver_name).map_err(|e| {
            ReservationError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            )
        })?;
        let reserver = reserver_name.trim();

        match self.gateway.reserve_gift(gift_id, reserver).await {
            Ok(ReserveOutcome::Applied(gift)) => {
                tracing::info!(gift_id = %gift_id, reserved_by = %reserver, "Gift reserved");
                Ok(Confirmed { gift })
            }
            Ok(ReserveOutcome::Rejected(current)) => {
                tracing::warn!(gift_id = %gift_id, "Gift reservation lost, already reserved");
                Err(ReservationError::Conflict { current })
            }
            Err(e) => {
                if !matches!(e, GatewayError::NotFound(_)) {
                    tracing::error!(gift_id = %gift_id, error = %e, "Gift reservation failed");
                }
                Err(e.into())
            }
        }
    }
}
