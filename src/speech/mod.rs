pub mod native;
pub mod watcher;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Slowest and fastest supported speech-speed multipliers.
pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;

/// Identifying metadata for a synthesized voice offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub language: String,
}

/// Platform speech synthesis capability.
pub trait SpeechEngine: Send + Sync {
    fn is_available(&self) -> bool;

    /// Ordered list of voices the platform currently offers.
    fn voices(&self) -> Result<Vec<VoiceInfo>>;

    /// Fire-and-forget: returns once the utterance is queued, not spoken.
    /// `None` speaks with the platform default voice.
    fn speak(&self, text: &str, voice: Option<&VoiceInfo>) -> Result<()>;

    /// Speech-speed multiplier, clamped to [`MIN_RATE`, `MAX_RATE`].
    /// 1.0 is the engine's normal rate.
    fn set_rate(&self, rate: f32) -> Result<()>;
}

/// Find the voice a request asked for. Returns `None` (the platform default
/// voice) when no identifier was given or the voice is no longer offered.
pub fn resolve_voice(engine: &dyn SpeechEngine, voice_id: Option<&str>) -> Option<VoiceInfo> {
    let id = voice_id?;
    match engine.voices() {
        Ok(voices) => {
            let found = voices.into_iter().find(|v| v.name == id);
            if found.is_none() {
                tracing::warn!("Voice '{}' is no longer available, using the default voice", id);
            }
            found
        }
        Err(e) => {
            tracing::warn!("Could not list voices: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticVoices(Vec<VoiceInfo>);

    impl SpeechEngine for StaticVoices {
        fn is_available(&self) -> bool {
            true
        }

        fn voices(&self) -> Result<Vec<VoiceInfo>> {
            Ok(self.0.clone())
        }

        fn speak(&self, _text: &str, _voice: Option<&VoiceInfo>) -> Result<()> {
            Ok(())
        }

        fn set_rate(&self, _rate: f32) -> Result<()> {
            Ok(())
        }
    }

    fn engine() -> StaticVoices {
        StaticVoices(vec![
            VoiceInfo {
                name: "Alex".into(),
                language: "en-US".into(),
            },
            VoiceInfo {
                name: "Amélie".into(),
                language: "fr-CA".into(),
            },
        ])
    }

    #[test]
    fn resolves_a_known_voice_by_name() {
        let voice = resolve_voice(&engine(), Some("Amélie")).unwrap();
        assert_eq!(voice.language, "fr-CA");
    }

    #[test]
    fn unknown_voice_falls_back_to_default() {
        assert_eq!(resolve_voice(&engine(), Some("Zarvox")), None);
    }

    #[test]
    fn no_selection_means_default() {
        assert_eq!(resolve_voice(&engine(), None), None);
    }
}
