//! Route definitions for the `/steps` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::{fields, steps};
use crate::state::AppState;

/// Routes mounted at `/steps`.
///
/// ```text
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// POST   /{id}/fields                   -> fields::create
/// PUT    /{id}/fields/order             -> fields::reorder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(steps::update).delete(steps::delete))
        .route("/{id}/fields", post(fields::create))
        .route("/{id}/fields/order", put(fields::reorder))
}
