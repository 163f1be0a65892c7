pub mod ai;
pub mod fields;
pub mod health;
pub mod steps;
pub mod submissions;
pub mod wizards;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /wizards                                   list, create (editor)
/// /wizards/{id}                              get tree, update, delete (editor)
/// /wizards/{id}/steps                        add step (editor)
/// /wizards/{id}/steps/order                  reorder steps (editor)
/// /wizards/{id}/submissions                  start or resume a session (public)
///
/// /steps/{id}                                update, delete (editor)
/// /steps/{id}/fields                         add field (editor)
/// /steps/{id}/fields/order                   reorder fields (editor)
///
/// /fields/{id}                               update, delete (editor)
///
/// /submissions                               list (editor)
/// /submissions/{id}                          detail (editor)
/// /submissions/{id}/session                  current session view (public)
/// /submissions/{id}/responses                save a step's answers (public)
/// /submissions/{id}/responses/{field_id}     save one answer (public)
/// /submissions/{id}/next                     advance (public)
/// /submissions/{id}/back                     go back (public)
///
/// /ai/transcribe                             speech to text (public)
/// /ai/suggest                                answer suggestion (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/wizards", wizards::router())
        .nest("/steps", steps::router())
        .nest("/fields", fields::router())
        .nest("/submissions", submissions::router())
        .nest("/ai", ai::router())
}
