//! Linear step navigation for respondents.
//!
//! State is the 0-based index of the current step, or the terminal
//! `Complete` state. `next` is gated on every required field of the current
//! step being answered; `back` always succeeds from an in-progress state and
//! never discards saved answers. Steps cannot be skipped.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::field_type::is_answered;
use crate::tree::FieldNode;
use crate::types::DbId;

/// Where a respondent is in a wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum NavState {
    /// Showing the step at this 0-based index.
    InProgress(usize),
    /// Past the last step; the submission is finalized.
    Complete,
}

/// The navigator over `total` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNavigator {
    state: NavState,
    total: usize,
}

impl StepNavigator {
    /// Start at the first step. A wizard with no steps cannot be navigated.
    pub fn new(total: usize) -> Result<Self, CoreError> {
        Self::resume(0, total, false)
    }

    /// Rebuild the navigator from persisted submission state.
    ///
    /// If steps were deleted since the submission started, an index past
    /// the end is clamped to the last step.
    pub fn resume(index: usize, total: usize, completed: bool) -> Result<Self, CoreError> {
        if completed {
            return Ok(Self {
                state: NavState::Complete,
                total,
            });
        }
        if total == 0 {
            return Err(CoreError::Validation(
                "Wizard has no steps to complete".to_string(),
            ));
        }
        Ok(Self {
            state: NavState::InProgress(index.min(total - 1)),
            total,
        })
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// The current step index, or `None` once complete.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            NavState::InProgress(i) => Some(i),
            NavState::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == NavState::Complete
    }

    /// Advance past the current step.
    ///
    /// `fields` are the current step's fields and `values` the respondent's
    /// saved answers keyed by field id. Fails without changing state if a
    /// required field is unanswered.
    pub fn next(
        &mut self,
        fields: &[FieldNode],
        values: &HashMap<DbId, String>,
    ) -> Result<NavState, CoreError> {
        let index = self.in_progress_index("advance")?;

        let missing = missing_required(fields, values);
        if !missing.is_empty() {
            let labels: Vec<&str> = missing.iter().map(|f| f.label.as_str()).collect();
            return Err(CoreError::Validation(format!(
                "Required fields missing: {}",
                labels.join(", ")
            )));
        }

        self.state = if index + 1 >= self.total {
            NavState::Complete
        } else {
            NavState::InProgress(index + 1)
        };
        Ok(self.state)
    }

    /// Go back one step; stays on the first step when already there.
    pub fn back(&mut self) -> Result<NavState, CoreError> {
        let index = self.in_progress_index("go back from")?;
        self.state = NavState::InProgress(index.saturating_sub(1));
        Ok(self.state)
    }

    fn in_progress_index(&self, action: &str) -> Result<usize, CoreError> {
        self.current_index().ok_or_else(|| {
            CoreError::Validation(format!("Cannot {action} a completed submission"))
        })
    }
}

/// Required fields among `fields` that have no answer in `values`.
pub fn missing_required<'a>(
    fields: &'a [FieldNode],
    values: &HashMap<DbId, String>,
) -> Vec<&'a FieldNode> {
    fields
        .iter()
        .filter(|f| f.required && !is_answered(f.field_type, values.get(&f.id).map(String::as_str)))
        .collect()
}
