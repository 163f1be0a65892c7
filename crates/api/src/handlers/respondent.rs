//! Public handlers that walk a respondent through a wizard.
//!
//! The caller holds the session token (the submission id) returned by
//! [`start`] and sends it back on every call. When the last step is passed
//! the returned session carries no token, so the caller knows to drop it.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use formstep_core::error::CoreError;
use formstep_core::field_type::validate_value;
use formstep_core::ids::parse_identifier;
use formstep_core::navigation::{NavState, StepNavigator};
use formstep_core::session::{can_resume, ensure_writable, RespondentSession};
use formstep_core::tree::{StepNode, WizardTree};
use formstep_core::types::DbId;
use formstep_db::models::field::WizardField;
use formstep_db::models::submission::{RecordResponse, RecordStep, StartSession, Submission};
use formstep_db::repositories::{FieldRepo, ResponseRepo, SubmissionRepo};
use formstep_db::tree::load_wizard_tree;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// What a respondent needs to render their current position.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session: RespondentSession,
    /// The step to show; `None` once completed.
    pub step: Option<StepNode>,
    /// Saved answers for the fields of `step`, keyed by field id.
    pub values: HashMap<DbId, String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_submission_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Submission> {
    SubmissionRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id,
        })
    })
}

async fn load_tree(pool: &sqlx::PgPool, wizard_id: DbId) -> AppResult<WizardTree> {
    load_wizard_tree(pool, wizard_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Wizard",
            id: wizard_id,
        })
    })
}

/// Rebuild the navigator from the persisted submission.
fn navigator_for(submission: &Submission, tree: &WizardTree) -> Result<StepNavigator, CoreError> {
    StepNavigator::resume(
        submission.current_step.max(0) as usize,
        tree.steps.len(),
        submission.completed_at.is_some(),
    )
}

/// All saved answers of a submission keyed by field id.
async fn saved_values(pool: &sqlx::PgPool, submission_id: DbId) -> AppResult<HashMap<DbId, String>> {
    Ok(ResponseRepo::list_by_submission(pool, submission_id)
        .await?
        .into_iter()
        .map(|r| (r.field_id, r.value))
        .collect())
}

async fn build_view(
    pool: &sqlx::PgPool,
    submission: &Submission,
    tree: &WizardTree,
    nav: &StepNavigator,
) -> AppResult<SessionView> {
    let session = RespondentSession::new(tree.id, submission.id, nav);
    let step = nav.current_index().and_then(|i| tree.steps.get(i)).cloned();

    let values = match &step {
        Some(step) => {
            let mut all = saved_values(pool, submission.id).await?;
            all.retain(|field_id, _| step.fields.iter().any(|f| f.id == *field_id));
            all
        }
        None => HashMap::new(),
    };

    Ok(SessionView {
        session,
        step,
        values,
    })
}

/// First address in `X-Forwarded-For`, if any.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check a value against the field it answers.
fn check_value(field: &WizardField, value: &str) -> AppResult<()> {
    let field_type = field.kind()?;
    let options = field.option_list();
    validate_value(field_type, options.as_deref(), value).map_err(|e| match e {
        CoreError::Validation(msg) => {
            AppError::Core(CoreError::Validation(format!("{}: {msg}", field.label)))
        }
        other => AppError::Core(other),
    })
}

// ---------------------------------------------------------------------------
// POST /wizards/{wizard_id}/submissions
// ---------------------------------------------------------------------------

/// Start a session, or resume the one named by `session_token`.
///
/// The JSON body is optional; a bodiless POST starts a fresh session.
///
/// Tokens that are unknown, finished, or belong to another wizard start a
/// fresh submission. Returns 201 for a new submission and 200 for a resume.
pub async fn start(
    State(state): State<AppState>,
    Path(wizard_id): Path<String>,
    headers: HeaderMap,
    input: Option<Json<StartSession>>,
) -> AppResult<impl IntoResponse> {
    let input = input.map(|Json(body)| body).unwrap_or_default();
    let wizard_id = parse_identifier(&wizard_id, "wizard id")?;
    let tree = load_tree(&state.pool, wizard_id).await?;
    // Rejects wizards without steps before anything is written.
    StepNavigator::new(tree.steps.len())?;

    let resumable = match input.session_token.as_deref() {
        Some(raw) => {
            let token = parse_identifier(raw, "session token")?;
            SubmissionRepo::find_by_id(&state.pool, token)
                .await?
                .filter(|s| can_resume(wizard_id, s.wizard_id, s.completed_at))
        }
        None => None,
    };

    let (submission, status) = match resumable {
        Some(submission) => {
            tracing::info!(wizard_id = %wizard_id, submission_id = %submission.id, "Session resumed");
            (submission, StatusCode::OK)
        }
        None => {
            let ip = client_ip(&headers);
            let submission = SubmissionRepo::create(
                &state.pool,
                wizard_id,
                input.metadata.as_ref(),
                ip.as_deref(),
            )
            .await?;
            tracing::info!(wizard_id = %wizard_id, submission_id = %submission.id, "Session started");
            (submission, StatusCode::CREATED)
        }
    };

    let nav = navigator_for(&submission, &tree)?;
    let view = build_view(&state.pool, &submission, &tree, &nav).await?;
    Ok((status, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /submissions/{id}/session
// ---------------------------------------------------------------------------

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "session token")?;
    let submission = ensure_submission_exists(&state.pool, id).await?;
    let tree = load_tree(&state.pool, submission.wizard_id).await?;

    let nav = navigator_for(&submission, &tree)?;
    let view = build_view(&state.pool, &submission, &tree, &nav).await?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /submissions/{id}/responses/{field_id}
// ---------------------------------------------------------------------------

/// Save one answer. Saving again replaces the previous answer.
pub async fn record_response(
    State(state): State<AppState>,
    Path((id, field_id)): Path<(String, String)>,
    Json(input): Json<RecordResponse>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "session token")?;
    let field_id = parse_identifier(&field_id, "field id")?;

    let submission = ensure_submission_exists(&state.pool, id).await?;
    ensure_writable(submission.id, submission.completed_at)?;

    let field = FieldRepo::find_in_wizard(&state.pool, field_id, submission.wizard_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Field",
            id: field_id,
        }))?;
    check_value(&field, &input.value)?;

    let response = ResponseRepo::upsert(&state.pool, submission.id, field.id, &input.value).await?;

    tracing::info!(submission_id = %id, field_id = %field_id, "Response recorded");
    Ok(Json(DataResponse { data: response }))
}

// ---------------------------------------------------------------------------
// PUT /submissions/{id}/responses
// ---------------------------------------------------------------------------

/// Save several answers at once. Nothing is written unless every value is valid.
pub async fn record_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RecordStep>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "session token")?;
    let submission = ensure_submission_exists(&state.pool, id).await?;
    ensure_writable(submission.id, submission.completed_at)?;

    let fields: HashMap<DbId, WizardField> =
        FieldRepo::list_by_wizard(&state.pool, submission.wizard_id)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

    let mut values = Vec::with_capacity(input.values.len());
    for (raw_id, value) in input.values {
        let field_id = parse_identifier(&raw_id, "field id")?;
        let field = fields.get(&field_id).ok_or(AppError::Core(CoreError::NotFound {
            entity: "Field",
            id: field_id,
        }))?;
        check_value(field, &value)?;
        values.push((field_id, value));
    }
    // Stable row-lock order across concurrent batches.
    values.sort_by_key(|(field_id, _)| *field_id);

    let responses = ResponseRepo::upsert_many(&state.pool, submission.id, &values).await?;

    tracing::info!(submission_id = %id, count = responses.len(), "Step responses recorded");
    Ok(Json(DataResponse { data: responses }))
}

// ---------------------------------------------------------------------------
// POST /submissions/{id}/next
// ---------------------------------------------------------------------------

/// Advance past the current step once its required fields are answered.
///
/// Passing the last step completes the submission.
pub async fn next(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "session token")?;
    let submission = ensure_submission_exists(&state.pool, id).await?;
    let tree = load_tree(&state.pool, submission.wizard_id).await?;

    let mut nav = navigator_for(&submission, &tree)?;
    let fields = nav
        .current_index()
        .and_then(|i| tree.steps.get(i))
        .map(|s| s.fields.as_slice())
        .unwrap_or_default();
    let values = saved_values(&state.pool, submission.id).await?;

    let moved = match nav.next(fields, &values)? {
        NavState::InProgress(index) => {
            SubmissionRepo::move_step(&state.pool, id, submission.current_step, index as i32)
                .await?
        }
        NavState::Complete => {
            SubmissionRepo::complete(&state.pool, id, submission.current_step).await?
        }
    };
    let updated = moved.ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Submission moved by another request; reload and retry".to_string(),
        ))
    })?;

    if nav.is_complete() {
        tracing::info!(submission_id = %id, wizard_id = %tree.id, "Submission completed");
    } else {
        tracing::info!(submission_id = %id, current_step = updated.current_step, "Advanced step");
    }

    let view = build_view(&state.pool, &updated, &tree, &nav).await?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /submissions/{id}/back
// ---------------------------------------------------------------------------

/// Return to the previous step. Answers are kept.
pub async fn back(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "session token")?;
    let submission = ensure_submission_exists(&state.pool, id).await?;
    let tree = load_tree(&state.pool, submission.wizard_id).await?;

    let mut nav = navigator_for(&submission, &tree)?;
    let index = match nav.back()? {
        NavState::InProgress(index) => index,
        NavState::Complete => {
            return Err(AppError::InternalError(
                "Navigator completed while moving back".to_string(),
            ))
        }
    };

    let updated = SubmissionRepo::move_step(&state.pool, id, submission.current_step, index as i32)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Submission moved by another request; reload and retry".to_string(),
            ))
        })?;

    tracing::info!(submission_id = %id, current_step = updated.current_step, "Moved back a step");
    let view = build_view(&state.pool, &updated, &tree, &nav).await?;
    Ok(Json(DataResponse { data: view }))
}
