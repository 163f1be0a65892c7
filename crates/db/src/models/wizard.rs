//! Wizard entity model and DTOs.

use formstep_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `wizards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wizard {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub theme_color_primary: Option<String>,
    pub theme_color_secondary: Option<String>,
    pub font_family: Option<String>,
    pub logo_url: Option<String>,
    pub background_url: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a wizard.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWizard {
    pub title: String,
    pub description: Option<String>,
}

/// DTO for updating a wizard. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWizard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub theme_color_primary: Option<String>,
    pub theme_color_secondary: Option<String>,
    pub font_family: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(url)]
    pub background_url: Option<String>,
}
