use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::scheduler::controller::AlarmController;
use crate::scheduler::timing::{Clock, SystemClock, TokioTimer};
use crate::speech::native::NativeSpeech;
use crate::speech::{SpeechEngine, VoiceInfo};

pub type CancelFlag = Arc<AtomicBool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmStatus {
    Idle,
    Armed,
}

impl Default for AlarmStatus {
    fn default() -> Self {
        Self::Idle
    }
}

pub struct AppState {
    pub controller: Arc<AlarmController>,
    pub clock: Arc<dyn Clock>,
    pub speech: Arc<dyn SpeechEngine>,
    pub voices: Mutex<Vec<VoiceInfo>>,
    pub settings: Mutex<Settings>,
    pub voice_watch_stop: CancelFlag,
}

impl AppState {
    pub fn new() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let speech: Arc<dyn SpeechEngine> = Arc::new(NativeSpeech::new());
        let controller = Arc::new(AlarmController::new(
            clock.clone(),
            Arc::new(TokioTimer::new()),
            speech.clone(),
        ));
        Self {
            controller,
            clock,
            speech,
            voices: Mutex::new(Vec::new()),
            settings: Mutex::new(Settings::default()),
            voice_watch_stop: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub speech: SpeechSettings,
    pub general: GeneralSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speech: SpeechSettings::default(),
            general: GeneralSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Preselected voice; updated to the voice of the last armed alarm.
    pub default_voice_id: Option<String>,
    /// Speech-speed multiplier, 1.0 is normal.
    pub rate: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            default_voice_id: None,
            rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Also raise a desktop notification when the alarm fires.
    pub notify_on_fire: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            notify_on_fire: true,
        }
    }
}
