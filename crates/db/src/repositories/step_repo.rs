//! Repository for the `wizard_steps` table.

use formstep_core::ordering::validate_permutation;
use formstep_core::types::DbId;
use sqlx::PgPool;

use crate::models::step::{UpdateStep, WizardStep};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, wizard_id, step_number, title, description, layout_style, created_at, updated_at";

/// Provides CRUD and ordering operations for wizard steps.
pub struct StepRepo;

impl StepRepo {
    /// Insert a step. A `None` step number appends after the current last step.
    ///
    /// A number already in use fails with the `uq_wizard_steps_wizard_step_number`
    /// unique violation.
    pub async fn create(
        pool: &PgPool,
        wizard_id: DbId,
        step_number: Option<i32>,
        title: &str,
        description: Option<&str>,
    ) -> Result<WizardStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO wizard_steps (wizard_id, step_number, title, description) \
             VALUES ($1, COALESCE($2, \
                (SELECT COALESCE(MAX(step_number), 0) + 1 FROM wizard_steps WHERE wizard_id = $1)), \
                $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardStep>(&query)
            .bind(wizard_id)
            .bind(step_number)
            .bind(title)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Find a step by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WizardStep>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wizard_steps WHERE id = $1");
        sqlx::query_as::<_, WizardStep>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a wizard's steps in display order.
    pub async fn list_by_wizard(
        pool: &PgPool,
        wizard_id: DbId,
    ) -> Result<Vec<WizardStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wizard_steps WHERE wizard_id = $1 ORDER BY step_number"
        );
        sqlx::query_as::<_, WizardStep>(&query)
            .bind(wizard_id)
            .fetch_all(pool)
            .await
    }

    /// Update a step's text. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStep,
    ) -> Result<Option<WizardStep>, sqlx::Error> {
        let query = format!(
            "UPDATE wizard_steps SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                layout_style = COALESCE($4, layout_style) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardStep>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.layout_style)
            .fetch_optional(pool)
            .await
    }

    /// Delete a step and its fields. Sibling step numbers are left as they are.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wizard_steps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign `step_number = position + 1` following `ordered`, atomically.
    ///
    /// The wizard's steps are locked for the duration of the transaction.
    /// Returns `None` (and changes nothing) when `ordered` is not a
    /// permutation of the wizard's current steps.
    pub async fn reorder(
        pool: &PgPool,
        wizard_id: DbId,
        ordered: &[DbId],
    ) -> Result<Option<Vec<WizardStep>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM wizard_steps WHERE wizard_id = $1 ORDER BY step_number FOR UPDATE",
        )
        .bind(wizard_id)
        .fetch_all(&mut *tx)
        .await?;

        if validate_permutation(&current, ordered, "step").is_err() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            "UPDATE wizard_steps s SET step_number = o.position::INTEGER \
             FROM unnest($2::UUID[]) WITH ORDINALITY AS o(id, position) \
             WHERE s.id = o.id AND s.wizard_id = $1",
        )
        .bind(wizard_id)
        .bind(ordered)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM wizard_steps WHERE wizard_id = $1 ORDER BY step_number"
        );
        let steps = sqlx::query_as::<_, WizardStep>(&query)
            .bind(wizard_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(steps))
    }
}
