//! Wizard step entity model and DTOs.

use formstep_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `wizard_steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WizardStep {
    pub id: DbId,
    pub wizard_id: DbId,
    pub step_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub layout_style: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a step. `step_number` defaults to one past the last step.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateStep {
    #[validate(range(min = 1))]
    pub step_number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating a step. Numbering changes go through [`ReorderSteps`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStep {
    pub title: Option<String>,
    pub description: Option<String>,
    pub layout_style: Option<String>,
}

/// DTO carrying the complete new step order for a wizard.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderSteps {
    pub step_ids: Vec<DbId>,
}
