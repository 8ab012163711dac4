// The Redwood Portal - themed event-coordination desktop client
// Entry point and application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod commands;
mod config;
mod error;
mod services;
mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redwood_portal=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting the Redwood Portal");

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .setup(|app| {
            tracing::info!("Running app setup");
            app::setup(app)?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_app_info,
            commands::open_admin_sheet,
            commands::sign_in,
            commands::sign_out,
            commands::current_guest,
            commands::guest_roster,
            commands::list_events,
            commands::toggle_event_response,
            commands::get_timeline,
            commands::list_notes,
            commands::add_note,
            commands::get_mood,
            commands::set_mood,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
