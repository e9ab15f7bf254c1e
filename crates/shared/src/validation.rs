//! Common validation utilities for guest-submitted input.

use validator::{ValidateEmail, ValidationError};

/// Maximum length of a guest, reserver or contributor name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of a free-text field (message, dietary note, song request).
pub const MAX_FREE_TEXT_LENGTH: usize = 2000;

lazy_static::lazy_static! {
    static ref MEDIA_TYPE_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z]+/[a-z0-9][a-z0-9.+-]*$").unwrap();
}

/// Validates that a display name is present and reasonably short.
///
/// Leading and trailing whitespace does not count towards the name. Control
/// characters (line breaks, tabs) are rejected anywhere in it.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("name_required");
        err.message = Some("Name is required".into());
        return Err(err);
    }
    if trimmed.chars().any(char::is_control) {
        let mut err = ValidationError::new("name_characters");
        err.message = Some("Name cannot contain line breaks or control characters".into());
        return Err(err);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message = Some(format!("Name cannot exceed {} characters", MAX_NAME_LENGTH).into());
        return Err(err);
    }
    Ok(())
}

/// Validates the syntax of a contact e-mail address.
pub fn validate_contact_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("email_required");
        err.message = Some("E-mail address is required".into());
        return Err(err);
    }
    if !trimmed.validate_email() {
        let mut err = ValidationError::new("email_format");
        err.message = Some("E-mail address is not valid".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that an optional free-text field stays within bounds.
pub fn validate_free_text(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(text) if text.chars().count() > MAX_FREE_TEXT_LENGTH => {
            let mut err = ValidationError::new("text_length");
            err.message = Some(
                format!("Text cannot exceed {} characters", MAX_FREE_TEXT_LENGTH).into(),
            );
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Validates that a party size is between 1 and `max` inclusive.
pub fn validate_party_size(size: u32, max: u32) -> Result<(), ValidationError> {
    if (1..=max).contains(&size) {
        Ok(())
    } else {
        let mut err = ValidationError::new("party_size_range");
        err.message = Some(format!("Party size must be between 1 and {}", max).into());
        Err(err)
    }
}

/// Validates a media type against a list of accepted patterns.
///
/// Patterns are either exact (`image/png`) or wildcard subtypes (`image/*`).
/// Comparison is case-insensitive.
pub fn validate_media_type(content_type: &str, accepted: &[String]) -> Result<(), ValidationError> {
    let normalized = content_type.trim().to_ascii_lowercase();
    // Drop parameters such as "; charset=binary".
    let essence = normalized.split(';').next().unwrap_or_default().trim();

    if !MEDIA_TYPE_REGEX.is_match(essence) {
        let mut err = ValidationError::new("media_type_format");
        err.message = Some(format!("'{}' is not a valid media type", content_type).into());
        return Err(err);
    }

    let matches = accepted.iter().any(|pattern| {
        let pattern = pattern.trim().to_ascii_lowercase();
        match pattern.strip_suffix("/*") {
            Some(top_level) => essence
                .split_once('/')
                .map(|(t, _)| t == top_level)
                .unwrap_or(false),
            None => pattern == essence,
        }
    });

    if matches {
        Ok(())
    } else {
        let mut err = ValidationError::new("media_type_unsupported");
        err.message = Some(format!("Media type '{}' is not accepted", essence).into());
        Err(err)
    }
}
