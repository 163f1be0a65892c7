//! Repository for the `wizard_submissions` table.

use formstep_core::types::DbId;
use sqlx::PgPool;

use crate::models::submission::{Submission, SubmissionSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, wizard_id, current_step, metadata, submitted_by_ip, \
     completed_at, submitted_at, updated_at";

/// Provides persistence for respondent submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Open a new submission positioned on the first step.
    pub async fn create(
        pool: &PgPool,
        wizard_id: DbId,
        metadata: Option<&serde_json::Value>,
        submitted_by_ip: Option<&str>,
    ) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO wizard_submissions (wizard_id, metadata, submitted_by_ip) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(wizard_id)
            .bind(metadata)
            .bind(submitted_by_ip)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wizard_submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move an open submission from step `from` to step `to`.
    ///
    /// Returns `None` when the submission is completed or no longer on
    /// `from`, which means another request moved it first.
    pub async fn move_step(
        pool: &PgPool,
        id: DbId,
        from: i32,
        to: i32,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE wizard_submissions SET current_step = $3 \
             WHERE id = $1 AND current_step = $2 AND completed_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Mark an open submission complete, provided it is still on step `from`.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        from: i32,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE wizard_submissions SET completed_at = NOW() \
             WHERE id = $1 AND current_step = $2 AND completed_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(from)
            .fetch_optional(pool)
            .await
    }

    /// List submissions newest first, optionally for one wizard only.
    pub async fn list_summaries(
        pool: &PgPool,
        wizard_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionSummary>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionSummary>(
            "SELECT s.id, s.wizard_id, w.title AS wizard_title, s.completed_at, s.submitted_at, \
                (SELECT COUNT(*) FROM wizard_responses r WHERE r.submission_id = s.id) \
                    AS response_count \
             FROM wizard_submissions s \
             JOIN wizards w ON w.id = s.wizard_id \
             WHERE ($1::UUID IS NULL OR s.wizard_id = $1) \
             ORDER BY s.submitted_at DESC, s.id \
             LIMIT $2 OFFSET $3",
        )
        .bind(wizard_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count submissions, optionally for one wizard only.
    pub async fn count(pool: &PgPool, wizard_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM wizard_submissions WHERE ($1::UUID IS NULL OR wizard_id = $1)",
        )
        .bind(wizard_id)
        .fetch_one(pool)
        .await
    }
}
