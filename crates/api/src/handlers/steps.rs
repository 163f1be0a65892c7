//! Handlers for wizard steps.
//!
//! Deleting a step leaves a gap in the numbering; clients close it with a
//! reorder. All routes require an editor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use formstep_core::error::CoreError;
use formstep_core::ids::parse_identifier;
use formstep_core::ordering::validate_permutation;
use formstep_core::types::DbId;
use formstep_core::wizard::{validate_requested_position, validate_title, DEFAULT_STEP_TITLE};
use formstep_db::models::step::{CreateStep, ReorderSteps, UpdateStep, WizardStep};
use formstep_db::repositories::StepRepo;
use validator::Validate;

use super::wizards::ensure_wizard_exists;
use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Verify that a step exists, returning the full row.
pub(crate) async fn ensure_step_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<WizardStep> {
    StepRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Step", id }))
}

// ---------------------------------------------------------------------------
// POST /wizards/{wizard_id}/steps
// ---------------------------------------------------------------------------

/// Add a step. Without a `step_number` it goes after the last step; an
/// explicit one may fill a hole left by a delete but not skip past the end.
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(wizard_id): Path<String>,
    Json(input): Json<CreateStep>,
) -> AppResult<impl IntoResponse> {
    let wizard_id = parse_identifier(&wizard_id, "wizard id")?;
    input.validate().map_err(validation_error)?;
    ensure_wizard_exists(&state.pool, wizard_id).await?;

    if let Some(requested) = input.step_number {
        let current_max = StepRepo::list_by_wizard(&state.pool, wizard_id)
            .await?
            .iter()
            .map(|s| s.step_number)
            .max();
        validate_requested_position("step_number", requested, current_max)?;
    }

    let title = match input.title.as_deref() {
        Some(t) if !t.trim().is_empty() => validate_title(t)?,
        _ => DEFAULT_STEP_TITLE.to_string(),
    };

    let step = StepRepo::create(
        &state.pool,
        wizard_id,
        input.step_number,
        &title,
        input.description.as_deref(),
    )
    .await?;

    tracing::info!(
        wizard_id = %wizard_id,
        step_id = %step.id,
        step_number = step.step_number,
        user_id = %user.user_id,
        "Step added",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: step })))
}

// ---------------------------------------------------------------------------
// PUT /steps/{id}
// ---------------------------------------------------------------------------

pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStep>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "step id")?;
    let patch = UpdateStep {
        title: input.title.as_deref().map(validate_title).transpose()?,
        ..input
    };

    let step = StepRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Step", id }))?;

    tracing::info!(step_id = %id, user_id = %user.user_id, "Step updated");
    Ok(Json(DataResponse { data: step }))
}

// ---------------------------------------------------------------------------
// DELETE /steps/{id}
// ---------------------------------------------------------------------------

pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_identifier(&id, "step id")?;
    if !StepRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Step", id }));
    }

    tracing::info!(step_id = %id, user_id = %user.user_id, "Step deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /wizards/{wizard_id}/steps/order
// ---------------------------------------------------------------------------

/// Renumber every step of a wizard to match `step_ids`.
pub async fn reorder(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(wizard_id): Path<String>,
    Json(input): Json<ReorderSteps>,
) -> AppResult<impl IntoResponse> {
    let wizard_id = parse_identifier(&wizard_id, "wizard id")?;
    ensure_wizard_exists(&state.pool, wizard_id).await?;

    let current: Vec<DbId> = StepRepo::list_by_wizard(&state.pool, wizard_id)
        .await?
        .iter()
        .map(|s| s.id)
        .collect();
    validate_permutation(&current, &input.step_ids, "step")?;

    let steps = StepRepo::reorder(&state.pool, wizard_id, &input.step_ids)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Steps changed during reorder; reload and retry".to_string(),
            ))
        })?;

    tracing::info!(
        wizard_id = %wizard_id,
        count = steps.len(),
        user_id = %user.user_id,
        "Steps reordered",
    );
    Ok(Json(DataResponse { data: steps }))
}
