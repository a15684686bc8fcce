use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tts::Tts;

use super::{SpeechEngine, VoiceInfo, MAX_RATE, MIN_RATE};

/// Speech engine backed by the platform synthesizer (speech-dispatcher on
/// Linux, SAPI on Windows, AVSpeechSynthesizer on macOS).
pub struct NativeSpeech {
    synth: Mutex<Option<Tts>>,
}

impl NativeSpeech {
    pub fn new() -> Self {
        let synth = match Tts::default() {
            Ok(tts) => Some(tts),
            Err(e) => {
                tracing::warn!("Speech synthesis is unavailable: {}", e);
                None
            }
        };
        Self {
            synth: Mutex::new(synth),
        }
    }
}

impl SpeechEngine for NativeSpeech {
    fn is_available(&self) -> bool {
        self.synth.lock().unwrap().is_some()
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        let guard = self.synth.lock().unwrap();
        let synth = guard
            .as_ref()
            .ok_or_else(|| anyhow!("speech synthesis unavailable"))?;
        let voices = synth.voices().context("failed to list voices")?;
        Ok(voices
            .into_iter()
            .map(|v| VoiceInfo {
                name: v.name(),
                language: v.language().to_string(),
            })
            .collect())
    }

    fn speak(&self, text: &str, voice: Option<&VoiceInfo>) -> Result<()> {
        let mut guard = self.synth.lock().unwrap();
        let synth = guard
            .as_mut()
            .ok_or_else(|| anyhow!("speech synthesis unavailable"))?;

        if let Some(voice) = voice {
            if synth.supported_features().voice {
                let offered = synth.voices().context("failed to list voices")?;
                if let Some(v) = offered.iter().find(|v| v.name() == voice.name) {
                    synth.set_voice(v).context("failed to select voice")?;
                }
            }
        }

        // Interrupt anything still being spoken; an alarm takes precedence.
        synth.speak(text, true).context("failed to queue utterance")?;
        Ok(())
    }

    fn set_rate(&self, rate: f32) -> Result<()> {
        let mut guard = self.synth.lock().unwrap();
        let synth = guard
            .as_mut()
            .ok_or_else(|| anyhow!("speech synthesis unavailable"))?;

        if !synth.supported_features().rate {
            tracing::debug!("Engine does not support rate changes");
            return Ok(());
        }

        let value = scale_rate(rate, synth.min_rate(), synth.normal_rate(), synth.max_rate());
        synth.set_rate(value).context("failed to set speech rate")?;
        Ok(())
    }
}

/// Map a [0.5, 2.0] multiplier onto the engine's own rate scale so that 1.0
/// lands exactly on the engine's normal rate.
fn scale_rate(multiplier: f32, min: f32, normal: f32, max: f32) -> f32 {
    let m = multiplier.clamp(MIN_RATE, MAX_RATE);
    if m >= 1.0 {
        normal + (max - normal) * (m - 1.0) / (MAX_RATE - 1.0)
    } else {
        min + (normal - min) * (m - MIN_RATE) / (1.0 - MIN_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_multiplier_maps_to_normal_rate() {
        assert_eq!(scale_rate(1.0, -100.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn extremes_map_to_engine_extremes() {
        assert_eq!(scale_rate(2.0, -100.0, 0.0, 100.0), 100.0);
        assert_eq!(scale_rate(0.5, -100.0, 0.0, 100.0), -100.0);
    }

    #[test]
    fn out_of_range_multipliers_are_clamped() {
        assert_eq!(scale_rate(5.0, -100.0, 0.0, 100.0), 100.0);
        assert_eq!(scale_rate(0.0, -100.0, 0.0, 100.0), -100.0);
    }

    #[test]
    fn halfway_points_interpolate() {
        assert_eq!(scale_rate(1.5, -100.0, 0.0, 100.0), 50.0);
        assert_eq!(scale_rate(0.75, -100.0, 0.0, 100.0), -50.0);
    }
}
