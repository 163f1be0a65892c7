//! Repository for the `wizard_fields` table.

use formstep_core::field_type::options_to_json;
use formstep_core::ordering::validate_permutation;
use formstep_core::types::DbId;
use sqlx::PgPool;

use crate::models::field::{FieldDefinition, WizardField};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, step_id, field_type, label, options, required, order_index, created_at, updated_at";

/// [`COLUMNS`] qualified with the `f` alias for joins.
const F_COLUMNS: &str = "f.id, f.step_id, f.field_type, f.label, f.options, f.required, \
     f.order_index, f.created_at, f.updated_at";

/// Provides CRUD and ordering operations for wizard fields.
pub struct FieldRepo;

impl FieldRepo {
    /// Insert a field. A `None` order index appends after the step's last field.
    pub async fn create(
        pool: &PgPool,
        step_id: DbId,
        def: &FieldDefinition,
        order_index: Option<i32>,
    ) -> Result<WizardField, sqlx::Error> {
        let query = format!(
            "INSERT INTO wizard_fields (step_id, field_type, label, options, required, order_index) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, \
                (SELECT COALESCE(MAX(order_index), 0) + 1 FROM wizard_fields WHERE step_id = $1))) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardField>(&query)
            .bind(step_id)
            .bind(def.field_type.as_str())
            .bind(&def.label)
            .bind(options_to_json(def.options.as_deref()))
            .bind(def.required)
            .bind(order_index)
            .fetch_one(pool)
            .await
    }

    /// Find a field by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WizardField>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wizard_fields WHERE id = $1");
        sqlx::query_as::<_, WizardField>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a field only if it belongs to one of `wizard_id`'s steps.
    pub async fn find_in_wizard(
        pool: &PgPool,
        id: DbId,
        wizard_id: DbId,
    ) -> Result<Option<WizardField>, sqlx::Error> {
        let query = format!(
            "SELECT {F_COLUMNS} FROM wizard_fields f \
             JOIN wizard_steps s ON s.id = f.step_id \
             WHERE f.id = $1 AND s.wizard_id = $2"
        );
        sqlx::query_as::<_, WizardField>(&query)
            .bind(id)
            .bind(wizard_id)
            .fetch_optional(pool)
            .await
    }

    /// List a step's fields in display order.
    pub async fn list_by_step(
        pool: &PgPool,
        step_id: DbId,
    ) -> Result<Vec<WizardField>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wizard_fields WHERE step_id = $1 ORDER BY order_index"
        );
        sqlx::query_as::<_, WizardField>(&query)
            .bind(step_id)
            .fetch_all(pool)
            .await
    }

    /// List every field of a wizard, ordered by step then field position.
    pub async fn list_by_wizard(
        pool: &PgPool,
        wizard_id: DbId,
    ) -> Result<Vec<WizardField>, sqlx::Error> {
        let query = format!(
            "SELECT {F_COLUMNS} FROM wizard_fields f \
             JOIN wizard_steps s ON s.id = f.step_id \
             WHERE s.wizard_id = $1 \
             ORDER BY s.step_number, f.order_index"
        );
        sqlx::query_as::<_, WizardField>(&query)
            .bind(wizard_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite a field's definition with an already merged and validated one.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        def: &FieldDefinition,
    ) -> Result<Option<WizardField>, sqlx::Error> {
        let query = format!(
            "UPDATE wizard_fields SET \
                field_type = $2, label = $3, options = $4, required = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardField>(&query)
            .bind(id)
            .bind(def.field_type.as_str())
            .bind(&def.label)
            .bind(options_to_json(def.options.as_deref()))
            .bind(def.required)
            .fetch_optional(pool)
            .await
    }

    /// Delete a field and its answers. Sibling positions are left as they are.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wizard_fields WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign `order_index = position + 1` following `ordered`, atomically.
    ///
    /// Returns `None` (and changes nothing) when `ordered` is not a
    /// permutation of the step's current fields.
    pub async fn reorder(
        pool: &PgPool,
        step_id: DbId,
        ordered: &[DbId],
    ) -> Result<Option<Vec<WizardField>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM wizard_fields WHERE step_id = $1 ORDER BY order_index FOR UPDATE",
        )
        .bind(step_id)
        .fetch_all(&mut *tx)
        .await?;

        if validate_permutation(&current, ordered, "field").is_err() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            "UPDATE wizard_fields f SET order_index = o.position::INTEGER \
             FROM unnest($2::UUID[]) WITH ORDINALITY AS o(id, position) \
             WHERE f.id = o.id AND f.step_id = $1",
        )
        .bind(step_id)
        .bind(ordered)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM wizard_fields WHERE step_id = $1 ORDER BY order_index"
        );
        let fields = sqlx::query_as::<_, WizardField>(&query)
            .bind(step_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(fields))
    }
}
