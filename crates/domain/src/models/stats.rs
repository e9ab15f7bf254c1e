//! Host dashboard models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GuestResponse, GuestbookEntry, MusicWish, PhotoContribution};

/// Summary counts derived from the stored records. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AggregateStats {
    pub attending: u64,
    pub declined: u64,
    pub pending: u64,
    /// Sum of party sizes over attending responses only.
    pub total_guests: u64,
    pub photos: u64,
}

impl AggregateStats {
    pub fn total_responses(&self) -> u64 {
        self.attending + self.declined + self.pending
    }
}

/// Everything the host dashboard shows, loaded in one go.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardSnapshot {
    pub stats: AggregateStats,
    pub responses: Vec<GuestResponse>,
    pub photos: Vec<PhotoContribution>,
    pub guestbook: Vec<GuestbookEntry>,
    pub music_wishes: Vec<MusicWish>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_responses() {
        let stats = AggregateStats {
            attending: 3,
            declined: 1,
            pending: 2,
            total_guests: 7,
            photos: 0,
        };
        assert_eq!(stats.total_responses(), 6);
    }

    #[test]
    fn test_stats_serialization() {
        let json = serde_json::to_string(&AggregateStats::default()).unwrap();
        assert!(json.contains("\"total_guests\":0"));
        assert!(json.contains("\"photos\":0"));
    }
}
