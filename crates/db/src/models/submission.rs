//! Submission entity model and respondent DTOs.

use std::collections::HashMap;

use formstep_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `wizard_submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub wizard_id: DbId,
    pub current_step: i32,
    pub metadata: Option<serde_json::Value>,
    pub submitted_by_ip: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub submitted_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A submission joined with its wizard's title, for admin listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionSummary {
    pub id: DbId,
    pub wizard_id: DbId,
    pub wizard_title: String,
    pub completed_at: Option<Timestamp>,
    pub submitted_at: Timestamp,
    pub response_count: i64,
}

/// Body for starting or resuming a respondent session.
///
/// `session_token` is the raw token the caller stored; it is validated as
/// a strict UUID before use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartSession {
    pub session_token: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Body for recording one answer.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordResponse {
    pub value: String,
}

/// Body for recording every answer on a step at once, keyed by raw field id.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordStep {
    pub values: HashMap<String, String>,
}
