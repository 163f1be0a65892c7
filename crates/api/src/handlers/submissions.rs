//! Editor-only review of respondent submissions.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use formstep_core::error::CoreError;
use formstep_core::ids::parse_identifier;
use formstep_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use formstep_core::session::SessionStatus;
use formstep_db::models::response::ResponseDetail;
use formstep_db::models::submission::Submission;
use formstep_db::repositories::{ResponseRepo, SubmissionRepo, WizardRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::query::SubmissionListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// A submission with its answers in display order.
#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: Submission,
    pub wizard_title: String,
    pub status: SessionStatus,
    pub responses: Vec<ResponseDetail>,
}

// ---------------------------------------------------------------------------
// GET /submissions
// ---------------------------------------------------------------------------

/// List submissions newest first, optionally filtered by `wizard_id`.
pub async fn list(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Query(params): Query<SubmissionListParams>,
) -> AppResult<impl IntoResponse> {
    let wizard_id = params
        .wizard_id
        .as_deref()
        .map(|raw| parse_identifier(raw, "wizard id"))
        .transpose()?;
    let page = params.pagination();
    let limit = clamp_limit(page.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(page.offset);

    let items = SubmissionRepo::list_summaries(&state.pool, wizard_id, limit, offset).await?;
    let total = SubmissionRepo::count(&state.pool, wizard_id).await?;

    tracing::debug!(count = items.len(), total, "Listed submissions");
    Ok(Json(PagedResponse {
        data: items,
        total,
        limit,
        offset,
    }))
}

// ---------------------------------------------------------------------------
// GET /submissions/{id}
// ---------------------------------------------------------------------------

pub async fn get_by_id(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "submission id")?;
    let submission = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id,
        }))?;
    let wizard = WizardRepo::find_by_id(&state.pool, submission.wizard_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Wizard",
            id: submission.wizard_id,
        }))?;
    let responses = ResponseRepo::list_detailed(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: SubmissionDetail {
            status: SessionStatus::from_completed_at(submission.completed_at),
            submission,
            wizard_title: wizard.title,
            responses,
        },
    }))
}
