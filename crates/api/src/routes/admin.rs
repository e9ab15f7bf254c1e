//! Host dashboard, stats and CSV export.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use domain::models::{AggregateStats, DashboardSnapshot};
use domain::services::{load_csv_export, load_dashboard, load_stats};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/admin/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    Ok(Json(load_dashboard(state.gateway.as_ref()).await?))
}

/// GET /api/v1/admin/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<AggregateStats>, ApiError> {
    Ok(Json(load_stats(state.gateway.as_ref()).await?))
}

/// Download all guest responses, oldest first.
///
/// GET /api/v1/admin/rsvps/export.csv
pub async fn export_rsvps_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = load_csv_export(state.gateway.as_ref()).await?;
    let disposition = format!(
        "attachment; filename=\"rsvps-{}.csv\"",
        state.config.event.id
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
