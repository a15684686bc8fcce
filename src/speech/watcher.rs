use std::sync::atomic::Ordering;
use std::time::Duration;

use tauri::{AppHandle, Emitter, Manager};

use crate::state::AppState;

/// How often the platform voice list is re-read.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Keep the cached voice catalog in sync with the platform, notifying the
/// webview whenever the list changes. Runs until the state's stop flag is
/// raised on app exit.
pub fn spawn_voice_watcher(app_handle: AppHandle) {
    tauri::async_runtime::spawn(async move {
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let state = app_handle.state::<AppState>();
            if state.voice_watch_stop.load(Ordering::Relaxed) {
                tracing::debug!("Voice watcher stopped");
                break;
            }

            let fresh = match state.speech.voices() {
                Ok(voices) => voices,
                Err(e) => {
                    tracing::debug!("Voice listing failed: {}", e);
                    continue;
                }
            };

            let changed = {
                let mut cached = state.voices.lock().unwrap();
                if *cached == fresh {
                    false
                } else {
                    *cached = fresh.clone();
                    true
                }
            };

            if changed {
                tracing::info!("Voice catalog changed ({} voices)", fresh.len());
                let _ = app_handle.emit("voices-changed", &fresh);
            }
        }
    });
}
