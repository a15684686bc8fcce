use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager};

use crate::scheduler::controller::AlarmRequest;
use crate::scheduler::{self, TimeConstraints};
use crate::state::{AlarmStatus, AppState};

/// Pending alarm details sent to the webview.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmInfo {
    pub message: String,
    pub voice_id: Option<String>,
    pub fire_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlarmSnapshot {
    pub status: AlarmStatus,
    pub pending: Option<AlarmInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulePreview {
    pub fire_at: String,
    pub delay_ms: u64,
}

fn alarm_info(request: &AlarmRequest) -> AlarmInfo {
    AlarmInfo {
        message: request.message.clone(),
        voice_id: request.voice_id.clone(),
        fire_at: request.fire_at.to_rfc3339(),
    }
}

/// Tauri command: validate the form and set the alarm
#[tauri::command]
pub fn arm_alarm(
    app_handle: AppHandle,
    message: String,
    voice_id: Option<String>,
    date: Option<String>,
    time: Option<String>,
) -> Result<AlarmInfo, String> {
    do_arm_alarm(&app_handle, message, voice_id, date, time).map_err(|e| e.to_string())
}

/// Tauri command: discard the pending alarm
#[tauri::command]
pub fn cancel_alarm(app_handle: AppHandle) -> Result<(), String> {
    let state = app_handle.state::<AppState>();
    state.controller.cancel();
    let _ = app_handle.emit("alarm-status", serde_json::json!({ "status": AlarmStatus::Idle }));
    Ok(())
}

/// Tauri command: current machine state plus pending alarm, for UI restore
#[tauri::command]
pub fn get_alarm(app_handle: AppHandle) -> Result<AlarmSnapshot, String> {
    let state = app_handle.state::<AppState>();
    Ok(AlarmSnapshot {
        status: state.controller.status(),
        pending: state.controller.pending_request().map(|r| alarm_info(&r)),
    })
}

/// Tauri command: when the current selection would fire, for the countdown
#[tauri::command]
pub fn schedule_preview(
    app_handle: AppHandle,
    date: Option<String>,
    time: Option<String>,
) -> Result<Option<SchedulePreview>, String> {
    do_schedule_preview(&app_handle, date, time).map_err(|e| e.to_string())
}

/// Tauri command: whether a calendar day must be rejected by the date picker
#[tauri::command]
pub fn date_disabled(app_handle: AppHandle, date: String) -> Result<bool, String> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| e.to_string())?;
    let state = app_handle.state::<AppState>();
    Ok(scheduler::is_date_disabled(day, &state.clock.now()))
}

/// Tauri command: hour/minute values the time picker must reject for a day
#[tauri::command]
pub fn time_constraints(
    app_handle: AppHandle,
    date: String,
    selected_hour: Option<u32>,
) -> Result<TimeConstraints, String> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| e.to_string())?;
    let state = app_handle.state::<AppState>();
    Ok(scheduler::disabled_time_ranges(day, selected_hour, &state.clock.now()))
}

pub fn do_arm_alarm(
    app_handle: &AppHandle,
    message: String,
    voice_id: Option<String>,
    date: Option<String>,
    time: Option<String>,
) -> Result<AlarmInfo> {
    let message = message.trim().to_string();
    if message.is_empty() {
        anyhow::bail!("Please enter a message to speak");
    }

    let date = parse_date(date.as_deref())?;
    let time = parse_time(time.as_deref())?;

    let state = app_handle.state::<AppState>();
    let voice_id =
        voice_id.or_else(|| state.settings.lock().unwrap().speech.default_voice_id.clone());

    let request = state.controller.arm(message, voice_id, date, time)?;

    // Remember the voice so the picker preselects it next time.
    {
        let mut settings = state.settings.lock().unwrap();
        if settings.speech.default_voice_id != request.voice_id {
            settings.speech.default_voice_id = request.voice_id.clone();
            crate::persistence::save_settings(app_handle, &settings);
        }
    }

    let _ = app_handle.emit("alarm-status", serde_json::json!({ "status": AlarmStatus::Armed }));
    Ok(alarm_info(&request))
}

fn do_schedule_preview(
    app_handle: &AppHandle,
    date: Option<String>,
    time: Option<String>,
) -> Result<Option<SchedulePreview>> {
    let date = parse_date(date.as_deref())?;
    let time = parse_time(time.as_deref())?;

    let state = app_handle.state::<AppState>();
    let now = state.clock.now();

    let Some(fire_at) = scheduler::resolve_instant(date, time, &now) else {
        return Ok(None);
    };
    let Some(delay) = scheduler::compute_delay(date, time, &now) else {
        return Ok(None);
    };

    Ok(Some(SchedulePreview {
        fire_at: fire_at.to_rfc3339(),
        delay_ms: delay.as_millis() as u64,
    }))
}

/// "YYYY-MM-DD" from the date input; empty or absent is a missing selection.
fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date '{}': {}", raw, e))?;
    Ok(Some(date))
}

/// "HH:MM" (or "HH:MM:SS") from the time input; empty or absent is a missing
/// selection.
fn parse_time(raw: Option<&str>) -> Result<Option<NaiveTime>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| anyhow::anyhow!("Invalid time '{}': {}", raw, e))?;
    Ok(Some(time))
}
