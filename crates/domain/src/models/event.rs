//! Per-event settings consumed by the guest-facing services.

use serde::{Deserialize, Serialize};

/// Settings that shape the RSVP wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettings {
    /// Display name of the event, e.g. "Sophie & Max".
    pub display_name: String,
    /// Menu options a guest must choose from when attending. Empty disables
    /// the menu question.
    #[serde(default)]
    pub menu_options: Vec<String>,
    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            display_name: "Our Wedding".to_string(),
            menu_options: default_menu_options(),
            max_party_size: default_max_party_size(),
        }
    }
}

impl EventSettings {
    pub fn has_menu(&self) -> bool {
        !self.menu_options.is_empty()
    }

    /// Case-insensitive lookup returning the configured spelling.
    pub fn find_menu_option(&self, choice: &str) -> Option<&str> {
        let choice = choice.trim();
        self.menu_options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(choice))
            .map(String::as_str)
    }
}

/// Constraints for staged photo uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    /// Accepted media types; `type/*` wildcards are allowed.
    #[serde(default = "default_accepted_media_types")]
    pub accepted_media_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
            accepted_media_types: default_accepted_media_types(),
        }
    }
}

pub fn default_menu_options() -> Vec<String> {
    ["meat", "fish", "vegetarian", "vegan"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_party_size() -> u32 {
    5
}

fn default_max_files() -> usize {
    20
}

fn default_max_file_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_accepted_media_types() -> Vec<String> {
    vec!["image/*".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_event_settings() {
        let settings = EventSettings::default();
        assert!(settings.has_menu());
        assert_eq!(settings.max_party_size, 5);
        assert_eq!(settings.menu_options.len(), 4);
    }

    #[test]
    fn test_find_menu_option_case_insensitive() {
        let settings = EventSettings {
            menu_options: vec!["Vegetarian".to_string(), "Fish".to_string()],
            ..Default::default()
        };
        assert_eq!(settings.find_menu_option("vegetarian"), Some("Vegetarian"));
        assert_eq!(settings.find_menu_option(" FISH "), Some("Fish"));
        assert_eq!(settings.find_menu_option("meat"), None);
    }

    #[test]
    fn test_upload_limits_deserialize_with_defaults() {
        let limits: UploadLimits = serde_json::from_str(r#"{"max_files": 3}"#).unwrap();
        assert_eq!(limits.max_files, 3);
        assert_eq!(limits.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(limits.accepted_media_types, vec!["image/*".to_string()]);
    }
}
