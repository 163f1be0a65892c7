//! Respondent session state.
//!
//! A respondent's progress is an explicit value handed back to the caller
//! after every respondent-side call. The caller persists `session_token`
//! (cookie, local storage, server session) and passes it into the next
//! call; nothing here relies on ambient global state. When the wizard is
//! finished the token is `None`, telling the caller to forget it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::navigation::{NavState, StepNavigator};
use crate::types::{DbId, Timestamp};

/// Lifecycle of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    /// Derive the status from a submission's `completed_at` column.
    pub fn from_completed_at(completed_at: Option<Timestamp>) -> Self {
        match completed_at {
            Some(_) => Self::Completed,
            None => Self::InProgress,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// The session value returned to respondents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentSession {
    pub wizard_id: DbId,
    pub submission_id: DbId,
    /// Token the caller must store and send back; `None` once completed.
    pub session_token: Option<DbId>,
    pub status: SessionStatus,
    /// 0-based index of the current step; `None` once completed.
    pub current_step: Option<usize>,
    pub total_steps: usize,
}

impl RespondentSession {
    pub fn new(wizard_id: DbId, submission_id: DbId, nav: &StepNavigator) -> Self {
        let (status, token) = match nav.state() {
            NavState::InProgress(_) => (SessionStatus::InProgress, Some(submission_id)),
            NavState::Complete => (SessionStatus::Completed, None),
        };
        Self {
            wizard_id,
            submission_id,
            session_token: token,
            status,
            current_step: nav.current_index(),
            total_steps: nav.total(),
        }
    }
}

/// Whether a stored token may be resumed for `wizard_id`.
///
/// Tokens for another wizard or for a finished submission start a fresh
/// submission instead.
pub fn can_resume(
    wizard_id: DbId,
    submission_wizard_id: DbId,
    completed_at: Option<Timestamp>,
) -> bool {
    wizard_id == submission_wizard_id && completed_at.is_none()
}

/// Reject writes to a submission that has been completed.
pub fn ensure_writable(submission_id: DbId, completed_at: Option<Timestamp>) -> Result<(), CoreError> {
    if completed_at.is_some() {
        return Err(CoreError::Conflict(format!(
            "Submission {submission_id} is already completed"
        )));
    }
    Ok(())
}
