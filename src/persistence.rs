use tauri::AppHandle;
use tauri_plugin_store::StoreExt;

use crate::state::Settings;

const STORE_FILE: &str = "settings.json";
const SETTINGS_KEY: &str = "settings";

/// Load persisted settings, falling back to defaults on any failure.
pub fn load_settings(app_handle: &AppHandle) -> Settings {
    let store = match app_handle.store(STORE_FILE) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Failed to open settings store: {}. Using defaults.", e);
            return Settings::default();
        }
    };

    let Some(value) = store.get(SETTINGS_KEY) else {
        tracing::info!("No stored settings found. Using defaults.");
        return Settings::default();
    };

    match serde_json::from_value(value) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to deserialize stored settings: {}. Using defaults.", e);
            Settings::default()
        }
    }
}

/// Persist the given settings. Failures are logged, never fatal.
pub fn save_settings(app_handle: &AppHandle, settings: &Settings) {
    let store = match app_handle.store(STORE_FILE) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open settings store for saving: {}", e);
            return;
        }
    };

    match serde_json::to_value(settings) {
        Ok(value) => {
            store.set(SETTINGS_KEY, value);
            if let Err(e) = store.save() {
                tracing::error!("Failed to save settings store to disk: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("Failed to serialize settings: {}", e);
        }
    }
}
