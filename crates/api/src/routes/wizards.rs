//! Route definitions for the `/wizards` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{respondent, steps, wizards};
use crate::state::AppState;

/// Routes mounted at `/wizards`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{id}                          -> get_tree
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
///
/// POST   /{id}/steps                    -> steps::create
/// PUT    /{id}/steps/order              -> steps::reorder
/// POST   /{id}/submissions              -> respondent::start
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wizards::list).post(wizards::create))
        .route(
            "/{id}",
            get(wizards::get_tree)
                .put(wizards::update)
                .delete(wizards::delete),
        )
        .route("/{id}/steps", post(steps::create))
        .route("/{id}/steps/order", put(steps::reorder))
        .route("/{id}/submissions", post(respondent::start))
}
