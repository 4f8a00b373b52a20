//! Field-level input validation shared by handlers.
//!
//! Each helper returns [`CoreError::Validation`] naming the offending field.

use validator::ValidateUrl;

use crate::error::CoreError;

/// Maximum length of a chat message body.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Maximum length of free-text notes on an order.
pub const MAX_NOTES_LEN: usize = 2000;

/// Reject empty or whitespace-only strings.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Reject strings longer than `max` characters.
pub fn require_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Reject negative amounts.
pub fn require_non_negative(field: &str, value: i64) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!("{field} must not be negative")));
    }
    Ok(())
}

/// Reject values above `max`.
pub fn require_at_most(field: &str, value: i64, max: i64) -> Result<(), CoreError> {
    if value > max {
        return Err(CoreError::Validation(format!("{field} must be at most {max}")));
    }
    Ok(())
}

/// Accept only absolute `http`/`https` URLs that parse with a host.
pub fn require_http_url(field: &str, value: &str) -> Result<(), CoreError> {
    let http = value.starts_with("https://") || value.starts_with("http://");
    if http && value.validate_url() {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "{field} must be an http(s) URL"
    )))
}

/// Clamp a user-provided page size into `1..=max`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Validate a chat message body.
pub fn validate_message_content(content: &str) -> Result<(), CoreError> {
    require_non_blank("content", content)?;
    require_max_len("content", content, MAX_MESSAGE_LEN)
}
