//! Role-based access control extractors.
//!
//! Roles are read from the `profiles` table on every request so a demoted
//! editor loses access immediately, whatever their token claims.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use formstep_core::error::CoreError;
use formstep_core::roles::is_editor_role;
use formstep_db::repositories::ProfileRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a stored `admin` or `super_admin` profile. Rejects with 401 for
/// a missing or invalid token and 403 otherwise.
///
/// The wrapped [`AuthUser::role`] is the stored role.
///
/// ```ignore
/// async fn editor_only(RequireEditor(user): RequireEditor) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut user = AuthUser::from_request_parts(parts, state).await?;

        let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Forbidden("No profile for caller".into())))?;

        if !is_editor_role(&profile.role) {
            tracing::debug!(user_id = %user.user_id, role = %profile.role, "Editor role required");
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }

        user.role = profile.role;
        Ok(RequireEditor(user))
    }
}
