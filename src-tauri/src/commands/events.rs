//! Itinerary and timeline commands

use crate::app::AppState;
use crate::error::Result;
use crate::services::Timeline;
use crate::store::models::{Event, Rsvp};
use tauri::State;

/// Fetch the events visible to the signed-in guest
#[tauri::command]
pub async fn list_events(state: State<'_, AppState>) -> Result<Vec<Event>> {
    let guest = state.session.require_current().await?;
    state.events.refresh(&guest).await
}

/// Flip the signed-in guest's answer for one event and return the new
/// value; the view patches its copy instead of re-fetching
#[tauri::command]
pub async fn toggle_event_response(
    state: State<'_, AppState>,
    event_id: String,
) -> Result<Rsvp> {
    let guest = state.session.require_current().await?;
    state.events.toggle_response(&event_id, &guest).await
}

/// The Forest Path: mist level plus events in date order. Renders for
/// signed-out visitors too, with secret events filtered out.
#[tauri::command]
pub async fn get_timeline(state: State<'_, AppState>) -> Result<Timeline> {
    let guest = state.session.current().await.unwrap_or_default();
    state.events.timeline(&guest).await
}
