//! Repository for the `wizard_responses` table.

use formstep_core::types::DbId;
use sqlx::PgPool;

use crate::models::response::{ResponseDetail, WizardResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, submission_id, field_id, value, created_at, updated_at";

/// Upsert statement keyed on the `(submission_id, field_id)` unique constraint.
const UPSERT: &str = "INSERT INTO wizard_responses (submission_id, field_id, value) \
     VALUES ($1, $2, $3) \
     ON CONFLICT ON CONSTRAINT uq_wizard_responses_submission_field \
     DO UPDATE SET value = EXCLUDED.value \
     RETURNING id, submission_id, field_id, value, created_at, updated_at";

/// Provides persistence for respondent answers.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Write one answer, replacing any earlier answer to the same field.
    pub async fn upsert(
        pool: &PgPool,
        submission_id: DbId,
        field_id: DbId,
        value: &str,
    ) -> Result<WizardResponse, sqlx::Error> {
        sqlx::query_as::<_, WizardResponse>(UPSERT)
            .bind(submission_id)
            .bind(field_id)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// Write several answers in one transaction. Either all land or none do.
    pub async fn upsert_many(
        pool: &PgPool,
        submission_id: DbId,
        values: &[(DbId, String)],
    ) -> Result<Vec<WizardResponse>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut saved = Vec::with_capacity(values.len());

        for (field_id, value) in values {
            let row = sqlx::query_as::<_, WizardResponse>(UPSERT)
                .bind(submission_id)
                .bind(field_id)
                .bind(value)
                .fetch_one(&mut *tx)
                .await?;
            saved.push(row);
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// All answers of a submission.
    pub async fn list_by_submission(
        pool: &PgPool,
        submission_id: DbId,
    ) -> Result<Vec<WizardResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wizard_responses WHERE submission_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, WizardResponse>(&query)
            .bind(submission_id)
            .fetch_all(pool)
            .await
    }

    /// Answers of a submission joined with their fields, in display order.
    pub async fn list_detailed(
        pool: &PgPool,
        submission_id: DbId,
    ) -> Result<Vec<ResponseDetail>, sqlx::Error> {
        sqlx::query_as::<_, ResponseDetail>(
            "SELECT r.field_id, f.step_id, s.step_number, f.order_index, f.label, \
                f.field_type, r.value, r.updated_at \
             FROM wizard_responses r \
             JOIN wizard_fields f ON f.id = r.field_id \
             JOIN wizard_steps s ON s.id = f.step_id \
             WHERE r.submission_id = $1 \
             ORDER BY s.step_number, f.order_index",
        )
        .bind(submission_id)
        .fetch_all(pool)
        .await
    }
}
