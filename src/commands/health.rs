//! Health Check Commands
//!
//! Probes the configured reasoning engine.

use crate::models::response::{CommandResponse, HealthResponse};
use crate::state::AppState;

/// Check that the engine endpoint answers for the configured model
pub async fn get_health(state: &AppState) -> CommandResponse<HealthResponse> {
    let engine = match state.engine().await {
        Ok(engine) => engine,
        Err(e) => return CommandResponse::err(e.to_string()),
    };
    match engine.health_check().await {
        Ok(()) => CommandResponse::ok(HealthResponse::online(engine.name(), engine.model())),
        Err(e) => {
            tracing::warn!(error = %e, "engine health check failed");
            CommandResponse::err(e.to_string())
        }
    }
}
