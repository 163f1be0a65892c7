//! Wizard-level constants and validation helpers.

use crate::error::CoreError;

/// Title given to a step added without one.
pub const DEFAULT_STEP_TITLE: &str = "New Step";

/// Label given to a field added without one.
pub const DEFAULT_FIELD_LABEL: &str = "New Question";

/// Maximum length of a wizard title.
pub const MAX_TITLE_LEN: usize = 200;

/// Validate a wizard title: non-blank and within [`MAX_TITLE_LEN`].
///
/// Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Whether `value` is a `#rgb` or `#rrggbb` hex color.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Validate an optional theme color supplied in a wizard patch.
pub fn validate_theme_color(name: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if !is_hex_color(v) => Err(CoreError::Validation(format!(
            "{name} must be a #rgb or #rrggbb hex color, got '{v}'"
        ))),
        _ => Ok(()),
    }
}

/// Position for an item appended after the current maximum (1-based).
pub fn next_position(current_max: Option<i32>) -> i32 {
    current_max.map_or(1, |m| m.max(0) + 1)
}

/// Check an explicitly requested position against the current maximum.
///
/// A position may fill a hole or append, never jump past the end.
pub fn validate_requested_position(
    name: &str,
    requested: i32,
    current_max: Option<i32>,
) -> Result<(), CoreError> {
    let next = next_position(current_max);
    if requested < 1 || requested > next {
        return Err(CoreError::Validation(format!(
            "{name} must be between 1 and {next}, got {requested}"
        )));
    }
    Ok(())
}
