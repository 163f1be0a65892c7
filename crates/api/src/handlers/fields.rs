//! Handlers for step fields.
//!
//! Type and options are validated together on the merged result of a patch,
//! so switching a field to a choice type without options fails while
//! switching away from one clears them. All routes require an editor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use formstep_core::error::CoreError;
use formstep_core::field_type::{normalize_options, FieldType};
use formstep_core::ids::parse_identifier;
use formstep_core::ordering::validate_permutation;
use formstep_core::types::DbId;
use formstep_core::wizard::{validate_requested_position, DEFAULT_FIELD_LABEL};
use formstep_db::models::field::{
    CreateField, FieldDefinition, ReorderFields, UpdateField, WizardField,
};
use formstep_db::repositories::FieldRepo;

use super::steps::ensure_step_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_field_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<WizardField> {
    FieldRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Field", id }))
}

fn validate_label(label: &str) -> Result<String, CoreError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Label must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// POST /steps/{step_id}/fields
// ---------------------------------------------------------------------------

/// Add a field. Without an `order_index` it goes after the step's last field.
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(step_id): Path<String>,
    Json(input): Json<CreateField>,
) -> AppResult<impl IntoResponse> {
    let step_id = parse_identifier(&step_id, "step id")?;
    let field_type = FieldType::from_str_db(&input.field_type)?;
    ensure_step_exists(&state.pool, step_id).await?;
    if let Some(requested) = input.order_index {
        let current_max = FieldRepo::list_by_step(&state.pool, step_id)
            .await?
            .iter()
            .map(|f| f.order_index)
            .max();
        validate_requested_position("order_index", requested, current_max)?;
    }

    let def = FieldDefinition {
        field_type,
        label: match input.label.as_deref() {
            Some(l) if !l.trim().is_empty() => l.trim().to_string(),
            _ => DEFAULT_FIELD_LABEL.to_string(),
        },
        options: normalize_options(field_type, input.options)?,
        required: input.required.unwrap_or(false),
    };

    let field = FieldRepo::create(&state.pool, step_id, &def, input.order_index).await?;

    tracing::info!(
        step_id = %step_id,
        field_id = %field.id,
        field_type = %field_type,
        user_id = %user.user_id,
        "Field added",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: field })))
}

// ---------------------------------------------------------------------------
// PUT /fields/{id}
// ---------------------------------------------------------------------------

/// Patch a field. Validation runs on the merged definition.
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateField>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "field id")?;
    let existing = ensure_field_exists(&state.pool, id).await?;

    let field_type = match input.field_type.as_deref() {
        Some(raw) => FieldType::from_str_db(raw)?,
        None => existing.kind()?,
    };
    let options = input.options.or_else(|| existing.option_list());

    let def = FieldDefinition {
        field_type,
        label: match input.label.as_deref() {
            Some(l) => validate_label(l)?,
            None => existing.label.clone(),
        },
        options: normalize_options(field_type, options)?,
        required: input.required.unwrap_or(existing.required),
    };

    let field = FieldRepo::update(&state.pool, id, &def)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Field", id }))?;

    tracing::info!(field_id = %id, user_id = %user.user_id, "Field updated");
    Ok(Json(DataResponse { data: field }))
}

// ---------------------------------------------------------------------------
// DELETE /fields/{id}
// ---------------------------------------------------------------------------

/// Delete a field and every answer given to it.
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_identifier(&id, "field id")?;
    if !FieldRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Field", id }));
    }

    tracing::info!(field_id = %id, user_id = %user.user_id, "Field deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /steps/{step_id}/fields/order
// ---------------------------------------------------------------------------

pub async fn reorder(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(step_id): Path<String>,
    Json(input): Json<ReorderFields>,
) -> AppResult<impl IntoResponse> {
    let step_id = parse_identifier(&step_id, "step id")?;
    ensure_step_exists(&state.pool, step_id).await?;

    let current: Vec<DbId> = FieldRepo::list_by_step(&state.pool, step_id)
        .await?
        .iter()
        .map(|f| f.id)
        .collect();
    validate_permutation(&current, &input.field_ids, "field")?;

    let fields = FieldRepo::reorder(&state.pool, step_id, &input.field_ids)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Fields changed during reorder; reload and retry".to_string(),
            ))
        })?;

    tracing::info!(
        step_id = %step_id,
        count = fields.len(),
        user_id = %user.user_id,
        "Fields reordered",
    );
    Ok(Json(DataResponse { data: fields }))
}
