use anyhow::Result;
use tauri::{AppHandle, Manager};

use crate::speech::{self, VoiceInfo};
use crate::state::AppState;

const PREVIEW_TEXT: &str = "This is how your alarm will sound.";

/// Tauri command: the cached voice catalog (queried fresh if still empty)
#[tauri::command]
pub fn list_voices(app_handle: AppHandle) -> Result<Vec<VoiceInfo>, String> {
    let cached = {
        let state = app_handle.state::<AppState>();
        state.voices.lock().unwrap().clone()
    };
    if !cached.is_empty() {
        return Ok(cached);
    }
    do_refresh_voices(&app_handle).map_err(|e| e.to_string())
}

/// Tauri command: re-read the voice list from the platform
#[tauri::command]
pub fn refresh_voices(app_handle: AppHandle) -> Result<Vec<VoiceInfo>, String> {
    do_refresh_voices(&app_handle).map_err(|e| e.to_string())
}

/// Tauri command: speak a short sample with the given voice right away
#[tauri::command]
pub fn preview_voice(app_handle: AppHandle, voice_id: Option<String>) -> Result<(), String> {
    do_preview_voice(&app_handle, voice_id).map_err(|e| e.to_string())
}

pub fn do_refresh_voices(app_handle: &AppHandle) -> Result<Vec<VoiceInfo>> {
    let state = app_handle.state::<AppState>();
    let fresh = state.speech.voices()?;
    *state.voices.lock().unwrap() = fresh.clone();
    Ok(fresh)
}

fn do_preview_voice(app_handle: &AppHandle, voice_id: Option<String>) -> Result<()> {
    let state = app_handle.state::<AppState>();
    if !state.speech.is_available() {
        anyhow::bail!("Speech synthesis is not available on this system");
    }

    let voice = speech::resolve_voice(state.speech.as_ref(), voice_id.as_deref());
    state.speech.speak(PREVIEW_TEXT, voice.as_ref())?;
    Ok(())
}
