//! Strict parsing of client-supplied identifiers.
//!
//! `Uuid::parse_str` also accepts the braced, URN and 32-digit simple forms.
//! Identifiers arriving from respondents must be the canonical hyphenated
//! form only, so the shape is checked before parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::DbId;

const CANONICAL_UUID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

static CANONICAL_UUID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CANONICAL_UUID_PATTERN).expect("valid regex"));

/// Parse `raw` as a canonical hyphenated UUID.
///
/// `what` names the identifier in the error message (e.g. `"field id"`).
pub fn parse_identifier(raw: &str, what: &str) -> Result<DbId, CoreError> {
    if !CANONICAL_UUID_RE.is_match(raw) {
        return Err(CoreError::Validation(format!(
            "Malformed {what} '{raw}': expected a hyphenated UUID"
        )));
    }
    DbId::parse_str(raw)
        .map_err(|e| CoreError::Validation(format!("Malformed {what} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_canonical_form() {
        let id = parse_identifier("67e55044-10b1-426f-9247-bb680e5fe0c8", "field id").unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn accepts_uppercase_hex() {
        assert!(parse_identifier("67E55044-10B1-426F-9247-BB680E5FE0C8", "field id").is_ok());
    }

    #[test]
    fn rejects_36_chars_that_are_not_a_uuid() {
        // Same length as a UUID, which a bare length check would have let through.
        let raw = "$ACTION_ID_0000000000000000000000000";
        assert_eq!(raw.len(), 36);
        assert_matches!(parse_identifier(raw, "field id"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_alternate_uuid_spellings() {
        for raw in [
            "67e5504410b1426f9247bb680e5fe0c8",
            "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
            "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8",
            " 67e55044-10b1-426f-9247-bb680e5fe0c8",
        ] {
            assert!(parse_identifier(raw, "field id").is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn error_names_the_identifier() {
        let err = parse_identifier("nope", "submission id").unwrap_err();
        assert!(err.to_string().contains("submission id"));
    }
}
