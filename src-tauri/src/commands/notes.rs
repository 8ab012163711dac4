//! Whispering wall commands

use crate::app::AppState;
use crate::error::Result;
use crate::store::models::GuestNote;
use tauri::State;

/// All notes on the wall, newest first
#[tauri::command]
pub async fn list_notes(state: State<'_, AppState>) -> Result<Vec<GuestNote>> {
    state.notes.list().await
}

/// Leave a note as the signed-in guest
#[tauri::command]
pub async fn add_note(state: State<'_, AppState>, message: String) -> Result<()> {
    let guest = state.session.require_current().await?;
    state.notes.add(&guest, &message).await
}
