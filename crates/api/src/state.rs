use std::sync::Arc;

use formstep_assist::AssistClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: formstep_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the transcription and suggestion endpoints.
    pub assist: Arc<AssistClient>,
}
