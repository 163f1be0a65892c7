//! Response entity model.

use formstep_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `wizard_responses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WizardResponse {
    pub id: DbId,
    pub submission_id: DbId,
    pub field_id: DbId,
    pub value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An answer joined with its field and step, in display order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResponseDetail {
    pub field_id: DbId,
    pub step_id: DbId,
    pub step_number: i32,
    pub order_index: i32,
    pub label: String,
    pub field_type: String,
    pub value: String,
    pub updated_at: Timestamp,
}
