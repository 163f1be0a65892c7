use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST   /transcribe                    -> transcribe (multipart, `file`)
/// POST   /suggest                       -> suggest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/transcribe",
            post(ai::transcribe).layer(DefaultBodyLimit::max(ai::MAX_AUDIO_BYTES)),
        )
        .route("/suggest", post(ai::suggest))
}
