use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::scheduler;
use crate::scheduler::timing::{AlarmTimer, Clock, TimerHandle};
use crate::speech::{self, SpeechEngine};
use crate::state::{AlarmStatus, CancelFlag};

/// Why an alarm could not be set. The message is shown to the user verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Speech synthesis is not available on this system")]
    SpeechUnavailable,
    #[error("Please select a future date and time")]
    NotInFuture,
    #[error("An alarm is already set")]
    AlreadyArmed,
}

/// What to speak, with which voice, and when. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmRequest {
    pub message: String,
    pub voice_id: Option<String>,
    pub fire_at: DateTime<Local>,
}

struct PendingAlarm {
    request: AlarmRequest,
    cancelled: CancelFlag,
    handle: TimerHandle,
}

/// Owns the single pending alarm. Two states: idle (nothing pending) and
/// armed (one pending alarm with a scheduled timer callback). Built from
/// injected clock, timer, and speech capabilities.
pub struct AlarmController {
    clock: Arc<dyn Clock>,
    timer: Arc<dyn AlarmTimer>,
    speech: Arc<dyn SpeechEngine>,
    pending: Mutex<Option<PendingAlarm>>,
    on_fired: Mutex<Option<Box<dyn Fn(&AlarmRequest) + Send + Sync>>>,
}

impl AlarmController {
    pub fn new(
        clock: Arc<dyn Clock>,
        timer: Arc<dyn AlarmTimer>,
        speech: Arc<dyn SpeechEngine>,
    ) -> Self {
        Self {
            clock,
            timer,
            speech,
            pending: Mutex::new(None),
            on_fired: Mutex::new(None),
        }
    }

    /// Observer invoked after a fired alarm has been handed to the speech
    /// engine.
    pub fn set_on_fired(&self, observer: impl Fn(&AlarmRequest) + Send + Sync + 'static) {
        *self.on_fired.lock().unwrap() = Some(Box::new(observer));
    }

    pub fn status(&self) -> AlarmStatus {
        if self.pending.lock().unwrap().is_some() {
            AlarmStatus::Armed
        } else {
            AlarmStatus::Idle
        }
    }

    pub fn pending_request(&self) -> Option<AlarmRequest> {
        self.pending.lock().unwrap().as_ref().map(|p| p.request.clone())
    }

    /// Validate the selection and schedule the alarm. On success the
    /// controller is armed and the created request is returned.
    pub fn arm(
        self: &Arc<Self>,
        message: String,
        voice_id: Option<String>,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    ) -> Result<AlarmRequest, ScheduleError> {
        if !self.speech.is_available() {
            return Err(ScheduleError::SpeechUnavailable);
        }

        let now = self.clock.now();
        let fire_at = scheduler::resolve_instant(date, time, &now)
            .ok_or(ScheduleError::NotInFuture)?;
        let delay = (fire_at - now).to_std().map_err(|_| ScheduleError::NotInFuture)?;

        // Holding the lock across scheduling keeps a second arm from racing
        // past the pending check.
        let mut pending = self.pending.lock().unwrap();
        if pending.is_some() {
            return Err(ScheduleError::AlreadyArmed);
        }

        let request = AlarmRequest {
            message,
            voice_id,
            fire_at,
        };
        let cancelled: CancelFlag = Arc::new(AtomicBool::new(false));

        let controller = Arc::clone(self);
        let flag = cancelled.clone();
        let fired_request = request.clone();
        let handle = self.timer.schedule_after(
            delay,
            Box::new(move || controller.fire(&flag, fired_request)),
        );

        *pending = Some(PendingAlarm {
            request: request.clone(),
            cancelled,
            handle,
        });

        tracing::info!(
            "Alarm armed for {} ({}s from now)",
            request.fire_at,
            delay.as_secs()
        );
        Ok(request)
    }

    /// Discard the pending alarm, if any. Safe to call repeatedly; once this
    /// returns, the alarm will not speak.
    pub fn cancel(&self) {
        let alarm = {
            let mut pending = self.pending.lock().unwrap();
            match pending.take() {
                Some(alarm) => {
                    alarm.cancelled.store(true, Ordering::Relaxed);
                    alarm
                }
                None => {
                    tracing::debug!("Cancel requested with no alarm set");
                    return;
                }
            }
        };

        self.timer.cancel(alarm.handle);
        tracing::info!("Alarm cancelled");
    }

    /// Timer callback: speak the message unless the alarm was cancelled in
    /// the meantime, then return to idle.
    fn fire(&self, cancelled: &CancelFlag, request: AlarmRequest) {
        {
            let mut pending = self.pending.lock().unwrap();
            if cancelled.load(Ordering::Relaxed) {
                return;
            }
            pending.take();
        }

        let voice = speech::resolve_voice(self.speech.as_ref(), request.voice_id.as_deref());
        match &voice {
            Some(v) => tracing::info!("Alarm fired, speaking with voice '{}'", v.name),
            None => tracing::info!("Alarm fired, speaking with the default voice"),
        }

        if let Err(e) = self.speech.speak(&request.message, voice.as_ref()) {
            tracing::error!("Failed to speak alarm message: {}", e);
        }

        if let Some(observer) = self.on_fired.lock().unwrap().as_ref() {
            observer(&request);
        }
    }
}
