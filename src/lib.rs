mod commands;
mod persistence;
mod scheduler;
mod speech;
mod state;

use std::sync::atomic::Ordering;

use state::AppState;
use tauri::{Emitter, Manager, RunEvent};
use tauri_plugin_notification::NotificationExt;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting Say It Later v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(tauri_plugin_notification::init())
        .manage(AppState::new())
        .invoke_handler(tauri::generate_handler![
            commands::alarm::arm_alarm,
            commands::alarm::cancel_alarm,
            commands::alarm::get_alarm,
            commands::alarm::schedule_preview,
            commands::alarm::date_disabled,
            commands::alarm::time_constraints,
            commands::voices::list_voices,
            commands::voices::refresh_voices,
            commands::voices::preview_voice,
            commands::settings::get_settings,
            commands::settings::update_settings,
            commands::settings::get_app_version,
        ])
        .setup(|app| {
            let loaded = persistence::load_settings(app.handle());
            {
                let state = app.state::<AppState>();
                if let Err(e) = state.speech.set_rate(loaded.speech.rate) {
                    tracing::warn!("Could not apply saved speech rate: {}", e);
                }
                *state.settings.lock().unwrap() = loaded;
                tracing::info!("Settings loaded from store");
            }

            // Prime the voice catalog so the picker has entries on first paint;
            // the watcher keeps it fresh afterwards.
            {
                let state = app.state::<AppState>();
                match state.speech.voices() {
                    Ok(voices) => {
                        tracing::info!("Voice catalog primed with {} voices", voices.len());
                        *state.voices.lock().unwrap() = voices;
                    }
                    Err(e) => tracing::warn!("Could not prime the voice catalog: {}", e),
                }
            }

            speech::watcher::spawn_voice_watcher(app.handle().clone());

            let handle = app.handle().clone();
            let state = app.state::<AppState>();
            state.controller.set_on_fired(move |request| {
                let _ = handle.emit(
                    "alarm-fired",
                    serde_json::json!({ "message": request.message }),
                );

                let notify = {
                    let state = handle.state::<AppState>();
                    let enabled = state.settings.lock().unwrap().general.notify_on_fire;
                    enabled
                };
                if notify {
                    if let Err(e) = handle
                        .notification()
                        .builder()
                        .title("Say It Later")
                        .body(&request.message)
                        .show()
                    {
                        tracing::warn!("Could not show alarm notification: {}", e);
                    }
                }
            });

            tracing::info!("App setup complete");

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| {
            if let RunEvent::Exit = event {
                let state = app_handle.state::<AppState>();
                state.voice_watch_stop.store(true, Ordering::Relaxed);
                state.controller.cancel();
            }
        });
}
