//! Host-facing aggregation and export.

use chrono::{SecondsFormat, Utc};
use shared::csv;

use super::gateway::{list_as, Gateway, GatewayError, OrderBy};
use crate::models::{
    AggregateStats, AttendanceStatus, DashboardSnapshot, GuestResponse, GuestbookEntry, MusicWish,
    PhotoContribution,
};

/// CSV header for guest response exports.
pub const CSV_HEADER: [&str; 6] = ["Name", "Email", "Status", "Guests", "Menu", "Date"];

/// Derive summary counts. Pure; only attending responses add guests.
pub fn compute_stats(responses: &[GuestResponse], photos: &[PhotoContribution]) -> AggregateStats {
    let mut stats = AggregateStats {
        photos: photos.len() as u64,
        ..Default::default()
    };
    for response in responses {
        match response.status {
            AttendanceStatus::Attending => {
                stats.attending += 1;
                stats.total_guests += u64::from(response.party_size);
            }
            AttendanceStatus::Declined => stats.declined += 1,
            AttendanceStatus::Pending => stats.pending += 1,
        }
    }
    stats
}

/// Control characters become spaces so every record stays on one line.
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Serialize responses as CSV, one row per response in the given order.
///
/// Produces exactly `responses.len() + 1` lines.
pub fn export_csv(responses: &[GuestResponse]) -> String {
    let mut out = String::new();
    csv::write_row(&mut out, CSV_HEADER);
    for response in responses {
        let guests = if response.is_attending() {
            response.party_size
        } else {
            0
        };
        csv::write_row(
            &mut out,
            [
                single_line(&response.name),
                single_line(&response.email),
                response.status.as_str().to_string(),
                guests.to_string(),
                single_line(response.menu.as_deref().unwrap_or_default()),
                response.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ],
        );
    }
    out
}

/// Load everything the dashboard shows. Resolves once all data is ready.
pub async fn load_dashboard(gateway: &dyn Gateway) -> Result<DashboardSnapshot, GatewayError> {
    let (responses, photos, guestbook, music_wishes) = tokio::try_join!(
        list_as::<GuestResponse>(gateway, Some(OrderBy::NEWEST_FIRST)),
        list_as::<PhotoContribution>(gateway, Some(OrderBy::NEWEST_FIRST)),
        list_as::<GuestbookEntry>(gateway, Some(OrderBy::NEWEST_FIRST)),
        list_as::<MusicWish>(gateway, Some(OrderBy::NEWEST_FIRST)),
    )?;

    let stats = compute_stats(&responses, &photos);
    tracing::debug!(
        responses = responses.len(),
        photos = photos.len(),
        "Dashboard snapshot loaded"
    );

    Ok(DashboardSnapshot {
        stats,
        responses,
        photos,
        guestbook,
        music_wishes,
        generated_at: Utc::now(),
    })
}

/// Load responses and photos and compute the stats.
pub async fn load_stats(gateway: &dyn Gateway) -> Result<AggregateStats, GatewayError> {
    let (responses, photos) = tokio::try_join!(
        list_as::<GuestResponse>(gateway, None),
        list_as::<PhotoContribution>(gateway, None),
    )?;
    Ok(compute_stats(&responses, &photos))
}

/// Load responses oldest first and export them.
pub async fn load_csv_export(gateway: &dyn Gateway) -> Result<String, GatewayError> {
    let responses: Vec<GuestResponse> = list_as(gateway, Some(OrderBy::OLDEST_FIRST)).await?;
    Ok(export_csv(&responses))
}
