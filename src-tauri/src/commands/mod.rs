//! Tauri commands exposed to the frontend
//!
//! This module organizes commands into logical submodules:
//! - `session`: entry gate, persisted identity, guest roster
//! - `events`: itinerary listing, RSVP toggles, timeline
//! - `notes`: the shared wall
//! - `moods`: the mood board

pub mod events;
pub mod moods;
pub mod notes;
pub mod session;

use crate::app::AppState;
use crate::error::{AppError, Result};
use tauri::State;
use tauri_plugin_shell::ShellExt;

// Re-export all commands for convenient registration in main.rs
pub use events::*;
pub use moods::*;
pub use notes::*;
pub use session::*;

// ===== General Commands =====

/// Get application information
#[tauri::command]
pub async fn get_app_info(state: State<'_, AppState>) -> Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        store_configured: state.config.script_url.is_some(),
    })
}

/// Application information structure
#[derive(serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub store_configured: bool,
}

/// Open the spreadsheet in the system browser. Only the configured admin
/// guest may do this, and only when a sheet link is configured.
#[tauri::command]
pub async fn open_admin_sheet(app: tauri::AppHandle, state: State<'_, AppState>) -> Result<()> {
    let guest = state.session.require_current().await?;
    if !state.config.is_admin(&guest) {
        return Err(AppError::NotAuthorized);
    }

    let url = state
        .config
        .sheet_url
        .clone()
        .ok_or_else(|| AppError::Generic("The spreadsheet link is not configured".to_string()))?;

    tracing::info!("Opening admin spreadsheet");
    app.shell()
        .open(url, None)
        .map_err(|e| AppError::Generic(format!("Failed to open spreadsheet link: {}", e)))
}
