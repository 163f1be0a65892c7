//! Nested, display-ordered view of a wizard's structure.
//!
//! The API returns this shape for `GET /wizards/{id}` and the editor mirror
//! keeps a copy of it. Steps are ordered by `step_number`, fields by
//! `order_index`.

use serde::{Deserialize, Serialize};

use crate::field_type::FieldType;
use crate::types::DbId;

/// A wizard with its steps and their fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardTree {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub theme_color_primary: Option<String>,
    pub theme_color_secondary: Option<String>,
    pub font_family: Option<String>,
    pub logo_url: Option<String>,
    pub background_url: Option<String>,
    pub steps: Vec<StepNode>,
}

/// One page of a wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepNode {
    pub id: DbId,
    pub step_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub layout_style: Option<String>,
    pub fields: Vec<FieldNode>,
}

/// One question on a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    pub id: DbId,
    pub step_id: DbId,
    pub field_type: FieldType,
    pub label: String,
    pub options: Option<Vec<String>>,
    pub required: bool,
    pub order_index: i32,
}

impl WizardTree {
    /// Sort steps by `step_number` and each step's fields by `order_index`.
    pub fn sort(&mut self) {
        self.steps.sort_by_key(|s| s.step_number);
        for step in &mut self.steps {
            step.fields.sort_by_key(|f| f.order_index);
        }
    }

    pub fn step(&self, step_id: DbId) -> Option<&StepNode> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn step_mut(&mut self, step_id: DbId) -> Option<&mut StepNode> {
        self.steps.iter_mut().find(|s| s.id == step_id)
    }

    /// Find a field anywhere in the wizard.
    pub fn field(&self, field_id: DbId) -> Option<&FieldNode> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.id == field_id)
    }

    pub fn field_mut(&mut self, field_id: DbId) -> Option<&mut FieldNode> {
        self.steps
            .iter_mut()
            .flat_map(|s| s.fields.iter_mut())
            .find(|f| f.id == field_id)
    }

    /// Step ids in display order.
    pub fn step_ids(&self) -> Vec<DbId> {
        self.steps.iter().map(|s| s.id).collect()
    }
}

impl StepNode {
    /// Field ids in display order.
    pub fn field_ids(&self) -> Vec<DbId> {
        self.fields.iter().map(|f| f.id).collect()
    }
}
