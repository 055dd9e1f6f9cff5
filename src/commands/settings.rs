//! Settings Commands
//!
//! Commands for reading and updating application settings.

use crate::models::response::CommandResponse;
use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::state::AppState;
use crate::utils::error::AppError;

/// Get current application settings
pub async fn get_settings(state: &AppState) -> CommandResponse<AppConfig> {
    CommandResponse::ok(state.get_config().await)
}

/// Update application settings with a partial update
pub async fn update_settings(state: &AppState, update: SettingsUpdate) -> CommandResponse<AppConfig> {
    if update.is_empty() {
        return CommandResponse::err(AppError::validation("no settings to update").to_string());
    }
    state.update_config(update).await.into()
}

/// Restore default settings
pub async fn reset_settings(state: &AppState) -> CommandResponse<AppConfig> {
    state.reset_config().await.into()
}
