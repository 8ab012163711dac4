//! Mood board commands

use crate::app::AppState;
use crate::error::Result;
use crate::store::models::Mood;
use tauri::State;

/// The signed-in guest's current mood, if set
#[tauri::command]
pub async fn get_mood(state: State<'_, AppState>) -> Result<Option<Mood>> {
    let guest = state.session.require_current().await?;
    state.moods.current(&guest).await
}

/// Set or overwrite the signed-in guest's mood
#[tauri::command]
pub async fn set_mood(state: State<'_, AppState>, mood: String) -> Result<Mood> {
    let guest = state.session.require_current().await?;
    state.moods.set(&guest, &mood).await
}
