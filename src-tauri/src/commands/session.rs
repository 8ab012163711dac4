//! Entry gate and session commands

use crate::app::AppState;
use crate::error::Result;
use tauri::State;

/// Check the magic word and remember the chosen guest name
#[tauri::command]
pub async fn sign_in(
    state: State<'_, AppState>,
    name: String,
    magic_word: String,
) -> Result<String> {
    state.session.sign_in(&name, &magic_word).await
}

/// Forget the persisted guest name
#[tauri::command]
pub async fn sign_out(state: State<'_, AppState>) -> Result<()> {
    state.session.sign_out().await
}

/// The signed-in guest name, if any. Protected screens check this on
/// mount and redirect to the entry screen when it is absent.
#[tauri::command]
pub async fn current_guest(state: State<'_, AppState>) -> Result<Option<String>> {
    Ok(state.session.current().await)
}

/// Guest names for the entry screen picker
#[tauri::command]
pub async fn guest_roster(state: State<'_, AppState>) -> Result<Vec<String>> {
    state.session.roster().await
}
