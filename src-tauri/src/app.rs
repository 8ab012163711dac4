//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::PortalConfig;
use crate::error::Result;
use crate::services::{EventsService, MoodsService, NotesService, SessionService};
use crate::store::StoreClient;
use tauri::{App, Manager};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: PortalConfig,
    pub session: SessionService,
    pub events: EventsService,
    pub notes: NotesService,
    pub moods: MoodsService,
    pub app_data_dir: std::path::PathBuf,
}

/// Application setup - called once on startup
pub fn setup(app: &mut App) -> Result<()> {
    tracing::info!("Initializing application");

    // Get app data directory
    let app_data_dir = app.path().app_data_dir()?;

    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(&app_data_dir)?;

    // Deployment configuration: portal.json plus environment overrides
    let config = PortalConfig::load(&app_data_dir);

    let store = StoreClient::new(config.script_url.clone())?;
    let session = SessionService::new(
        app_data_dir.clone(),
        config.magic_word.clone(),
        store.clone(),
    );
    let events = EventsService::new(store.clone());
    let notes = NotesService::new(store.clone());
    let moods = MoodsService::new(store);

    let state = AppState {
        config,
        session,
        events,
        notes,
        moods,
        app_data_dir,
    };
    app.manage(state);

    tracing::info!("Application initialized successfully");

    Ok(())
}
