use tauri::{AppHandle, Manager};

use crate::state::{AppState, Settings};

#[tauri::command]
pub fn get_settings(app_handle: AppHandle) -> Result<Settings, String> {
    let state = app_handle.state::<AppState>();
    let settings = state.settings.lock().unwrap().clone();
    Ok(settings)
}

#[tauri::command]
pub fn update_settings(app_handle: AppHandle, settings: Settings) -> Result<(), String> {
    let state = app_handle.state::<AppState>();

    if let Err(e) = state.speech.set_rate(settings.speech.rate) {
        tracing::warn!("Could not apply speech rate: {}", e);
    }

    let mut current = state.settings.lock().unwrap();
    *current = settings;
    crate::persistence::save_settings(&app_handle, &current);
    Ok(())
}

#[tauri::command]
pub fn get_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
