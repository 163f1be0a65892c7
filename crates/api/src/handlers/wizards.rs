//! Handlers for the `/wizards` resource.
//!
//! All routes require an editor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use formstep_core::error::CoreError;
use formstep_core::ids::parse_identifier;
use formstep_core::types::DbId;
use formstep_core::wizard::{validate_theme_color, validate_title};
use formstep_db::models::wizard::{CreateWizard, UpdateWizard, Wizard};
use formstep_db::repositories::WizardRepo;
use formstep_db::tree::load_wizard_tree;
use validator::Validate;

use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a wizard exists, returning the full row.
pub(crate) async fn ensure_wizard_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Wizard> {
    WizardRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Wizard",
            id,
        })
    })
}

// ---------------------------------------------------------------------------
// POST /wizards
// ---------------------------------------------------------------------------

/// Create an empty wizard owned by the caller.
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateWizard>,
) -> AppResult<impl IntoResponse> {
    let title = validate_title(&input.title)?;
    let wizard =
        WizardRepo::create(&state.pool, &title, input.description.as_deref(), user.user_id)
            .await?;

    tracing::info!(wizard_id = %wizard.id, user_id = %user.user_id, "Wizard created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: wizard })))
}

// ---------------------------------------------------------------------------
// GET /wizards
// ---------------------------------------------------------------------------

pub async fn list(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let wizards = WizardRepo::list(&state.pool).await?;
    tracing::debug!(count = wizards.len(), "Listed wizards");
    Ok(Json(DataResponse { data: wizards }))
}

// ---------------------------------------------------------------------------
// GET /wizards/{id}
// ---------------------------------------------------------------------------

/// The wizard with its steps and fields, in display order.
pub async fn get_tree(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "wizard id")?;
    let tree = load_wizard_tree(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Wizard",
            id,
        }))?;
    Ok(Json(DataResponse { data: tree }))
}

// ---------------------------------------------------------------------------
// PUT /wizards/{id}
// ---------------------------------------------------------------------------

/// Patch wizard settings. Only supplied fields change.
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateWizard>,
) -> AppResult<impl IntoResponse> {
    let id = parse_identifier(&id, "wizard id")?;
    input.validate().map_err(validation_error)?;
    validate_theme_color("theme_color_primary", input.theme_color_primary.as_deref())?;
    validate_theme_color(
        "theme_color_secondary",
        input.theme_color_secondary.as_deref(),
    )?;

    let patch = UpdateWizard {
        title: input.title.as_deref().map(validate_title).transpose()?,
        ..input
    };

    let wizard = WizardRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Wizard",
            id,
        }))?;

    tracing::info!(wizard_id = %id, user_id = %user.user_id, "Wizard updated");
    Ok(Json(DataResponse { data: wizard }))
}

// ---------------------------------------------------------------------------
// DELETE /wizards/{id}
// ---------------------------------------------------------------------------

/// Delete a wizard with its steps, fields, submissions and responses.
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_identifier(&id, "wizard id")?;
    if !WizardRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Wizard",
            id,
        }));
    }

    tracing::info!(wizard_id = %id, user_id = %user.user_id, "Wizard deleted");
    Ok(StatusCode::NO_CONTENT)
}
