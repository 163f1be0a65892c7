//! Wizard field entity model and DTOs.

use formstep_core::error::CoreError;
use formstep_core::field_type::{options_from_json, FieldType};
use formstep_core::tree::FieldNode;
use formstep_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `wizard_fields` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WizardField {
    pub id: DbId,
    pub step_id: DbId,
    pub field_type: String,
    pub label: String,
    pub options: Option<serde_json::Value>,
    pub required: bool,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WizardField {
    pub fn kind(&self) -> Result<FieldType, CoreError> {
        FieldType::from_str_db(&self.field_type)
    }

    pub fn option_list(&self) -> Option<Vec<String>> {
        options_from_json(self.options.as_ref())
    }

    pub fn to_node(&self) -> Result<FieldNode, CoreError> {
        Ok(FieldNode {
            id: self.id,
            step_id: self.step_id,
            field_type: self.kind()?,
            label: self.label.clone(),
            options: self.option_list(),
            required: self.required,
            order_index: self.order_index,
        })
    }
}

/// Request body for adding a field.
///
/// `field_type` stays a string here so an unknown type is reported as a
/// validation error rather than a body-parsing rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateField {
    pub field_type: String,
    pub label: Option<String>,
    pub options: Option<Vec<String>>,
    pub required: Option<bool>,
    pub order_index: Option<i32>,
}

/// Request body for updating a field. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateField {
    pub field_type: Option<String>,
    pub label: Option<String>,
    pub options: Option<Vec<String>>,
    pub required: Option<bool>,
}

/// A validated field definition ready to be written.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub field_type: FieldType,
    pub label: String,
    pub options: Option<Vec<String>>,
    pub required: bool,
}

/// DTO carrying the complete new field order for a step.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderFields {
    pub field_ids: Vec<DbId>,
}
