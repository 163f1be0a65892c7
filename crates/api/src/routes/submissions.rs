//! Route definitions for the `/submissions` resource.
//!
//! Review routes require an editor; the respondent routes are public and
//! keyed by the session token.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{respondent, submissions};
use crate::state::AppState;

/// Routes mounted at `/submissions`.
///
/// ```text
/// GET    /                              -> submissions::list
/// GET    /{id}                          -> submissions::get_by_id
/// GET    /{id}/session                  -> respondent::get_session
/// PUT    /{id}/responses                -> respondent::record_step
/// PUT    /{id}/responses/{field_id}     -> respondent::record_response
/// POST   /{id}/next                     -> respondent::next
/// POST   /{id}/back                     -> respondent::back
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(submissions::list))
        .route("/{id}", get(submissions::get_by_id))
        .route("/{id}/session", get(respondent::get_session))
        .route("/{id}/responses", put(respondent::record_step))
        .route(
            "/{id}/responses/{field_id}",
            put(respondent::record_response),
        )
        .route("/{id}/next", post(respondent::next))
        .route("/{id}/back", post(respondent::back))
}
