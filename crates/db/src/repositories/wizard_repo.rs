//! Repository for the `wizards` table.

use formstep_core::types::DbId;
use sqlx::PgPool;

use crate::models::wizard::{UpdateWizard, Wizard};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, theme_color_primary, theme_color_secondary, \
     font_family, logo_url, background_url, created_by, created_at, updated_at";

/// Provides CRUD operations for wizards.
pub struct WizardRepo;

impl WizardRepo {
    /// Insert a new wizard, returning the created row.
    ///
    /// `title` must already be validated and trimmed.
    pub async fn create(
        pool: &PgPool,
        title: &str,
        description: Option<&str>,
        created_by: DbId,
    ) -> Result<Wizard, sqlx::Error> {
        let query = format!(
            "INSERT INTO wizards (title, description, created_by) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wizard>(&query)
            .bind(title)
            .bind(description)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a wizard by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Wizard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wizards WHERE id = $1");
        sqlx::query_as::<_, Wizard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all wizards, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Wizard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wizards ORDER BY created_at DESC");
        sqlx::query_as::<_, Wizard>(&query).fetch_all(pool).await
    }

    /// Update a wizard. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWizard,
    ) -> Result<Option<Wizard>, sqlx::Error> {
        let query = format!(
            "UPDATE wizards SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                theme_color_primary = COALESCE($4, theme_color_primary), \
                theme_color_secondary = COALESCE($5, theme_color_secondary), \
                font_family = COALESCE($6, font_family), \
                logo_url = COALESCE($7, logo_url), \
                background_url = COALESCE($8, background_url) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wizard>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.theme_color_primary)
            .bind(&input.theme_color_secondary)
            .bind(&input.font_family)
            .bind(&input.logo_url)
            .bind(&input.background_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a wizard and, by cascade, its steps, fields and submissions.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wizards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
