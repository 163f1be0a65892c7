//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `clamp_limit` / `clamp_offset` before use.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for the submission listing (`?wizard_id=&limit=&offset=`).
///
/// `wizard_id` stays a raw string so a malformed id is a validation error.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListParams {
    pub wizard_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SubmissionListParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}
