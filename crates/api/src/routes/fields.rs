use axum::routing::put;
use axum::Router;

use crate::handlers::fields;
use crate::state::AppState;

/// Routes mounted at `/fields`.
///
/// ```text
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(fields::update).delete(fields::delete))
}
