//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use domain::services::{Collection, GatewayError};
use serde::Serialize;
use std::time::Instant;

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub event_id: String,
    pub data_store: DataStoreHealth,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DataStoreHealth {
    pub configured: bool,
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

async fn probe(state: &AppState) -> (Result<(), GatewayError>, u64) {
    let start = Instant::now();
    let result = state
        .gateway
        .list(Collection::GiftItems, None)
        .await
        .map(|_| ());
    (result, start.elapsed().as_millis() as u64)
}

/// Full health check.
///
/// An unconfigured data store still answers 200 with status `degraded`: the
/// site is up and each write reports the missing backend itself.
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let (result, latency_ms) = probe(&state).await;

    let (status, code, data_store) = match &result {
        Ok(()) => (
            "healthy",
            StatusCode::OK,
            DataStoreHealth {
                configured: true,
                connected: true,
                latency_ms: Some(latency_ms),
            },
        ),
        Err(e) if e.is_unconfigured() => (
            "degraded",
            StatusCode::OK,
            DataStoreHealth {
                configured: false,
                connected: false,
                latency_ms: None,
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health probe failed");
            (
                "unhealthy",
                StatusCode::SERVICE_UNAVAILABLE,
                DataStoreHealth {
                    configured: true,
                    connected: false,
                    latency_ms: None,
                },
            )
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            event_id: state.config.event.id.clone(),
            data_store,
        }),
    )
}

/// Liveness probe. 200 while the process runs.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe. 200 only when the data store answers.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    match probe(&state).await {
        (Ok(()), _) => Ok(Json(StatusResponse {
            status: "ready".to_string(),
        })),
        (Err(_), _) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "degraded".to_string(),
            version: "0.3.0".to_string(),
            event_id: "wedding".to_string(),
            data_store: DataStoreHealth {
                configured: false,
                connected: false,
                latency_ms: None,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["data_store"]["configured"], false);
        assert!(json["data_store"]["latency_ms"].is_null());
    }
}
