//! On-device synthesis through the platform speech engine.

use std::{
    sync::{
        mpsc::Sender,
        Arc,
        Mutex,
    },
    thread,
    time::{
        Duration,
        Instant,
    },
};

use tts::{
    Tts,
    Voice,
};

use super::{
    SpeakOptions,
    SpeechBackend,
    SpeechOutcome,
    UtteranceEvent,
};
use crate::core::TangochoError;

/// Some platforms report an empty voice list right after engine creation
/// and fill it in asynchronously. We re-poll within this budget on the
/// first speak, then give up and let the backend's default voice handle it.
const VOICE_WAIT_BUDGET: Duration = Duration::from_millis(250);
const VOICE_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct PlatformVoice {
    tts: Tts,
    tx: Sender<UtteranceEvent>,
    /// Id of the utterance currently in flight, read by the end callback.
    current: Arc<Mutex<u64>>,
    voice: Option<Voice>,
    voice_wait_spent: bool,
    has_callbacks: bool,
    rate_support: bool,
}

impl PlatformVoice {
    pub fn new(tx: Sender<UtteranceEvent>) -> Result<Self, TangochoError> {
        let mut tts = Tts::default().map_err(|e| TangochoError::Speech(e.to_string()))?;
        let features = tts.supported_features();

        let current = Arc::new(Mutex::new(0u64));
        let has_callbacks = features.utterance_callbacks;

        if has_callbacks {
            let callback_current = Arc::clone(&current);
            let callback_tx = tx.clone();
            tts.on_utterance_end(Some(Box::new(move |_| {
                let id = *callback_current.lock().expect("utterance id lock");
                let _ = callback_tx.send((id, SpeechOutcome::Completed));
            })))
            .map_err(|e| TangochoError::Speech(e.to_string()))?;
        }

        Ok(Self {
            tts,
            tx,
            current,
            voice: None,
            voice_wait_spent: false,
            has_callbacks,
            rate_support: features.rate,
        })
    }

    /// Voice policy: first voice whose language starts with the hint's
    /// primary subtag, else the first enumerable voice, else none (the
    /// backend default). The list may still be loading on the first call,
    /// so we re-poll inside a bounded window before settling.
    fn ensure_voice(&mut self, language_hint: &str) {
        if self.voice.is_some() {
            return;
        }

        let prefix: String =
            language_hint.split(['-', '_']).next().unwrap_or("en").to_lowercase();

        let mut voices = self.tts.voices().unwrap_or_default();
        if voices.is_empty() && !self.voice_wait_spent {
            self.voice_wait_spent = true;
            let deadline = Instant::now() + VOICE_WAIT_BUDGET;
            while voices.is_empty() && Instant::now() < deadline {
                thread::sleep(VOICE_POLL_INTERVAL);
                voices = self.tts.voices().unwrap_or_default();
            }
        }

        let chosen = voices
            .iter()
            .find(|v| v.language().to_string().to_lowercase().starts_with(&prefix))
            .or_else(|| voices.first())
            .cloned();

        if let Some(voice) = chosen {
            if let Err(e) = self.tts.set_voice(&voice) {
                eprintln!("[Speech] Failed to select voice {}: {}", voice.name(), e);
            } else {
                self.voice = Some(voice);
            }
        }
    }

}

impl SpeechBackend for PlatformVoice {
    fn speak(
        &mut self,
        id: u64,
        text: &str,
        options: &SpeakOptions,
    ) -> Result<(), TangochoError> {
        self.ensure_voice(&options.language_hint);

        if self.rate_support {
            let normal = self.tts.normal_rate();
            let rate = (normal * options.rate)
                .clamp(self.tts.min_rate(), self.tts.max_rate());
            if let Err(e) = self.tts.set_rate(rate) {
                eprintln!("[Speech] Failed to set rate: {}", e);
            }
        }

        *self.current.lock().expect("utterance id lock") = id;

        // interrupt = true: the platform engine drops any queued utterance.
        self.tts.speak(text, true).map_err(|e| TangochoError::Speech(e.to_string()))?;

        if !self.has_callbacks {
            // No end events from this backend: synthesize one with a timer
            // scaled by text length. A superseded id is dropped on receipt.
            let tx = self.tx.clone();
            let estimate = estimate_duration(text, options.rate);
            thread::spawn(move || {
                thread::sleep(estimate);
                let _ = tx.send((id, SpeechOutcome::Completed));
            });
        }

        Ok(())
    }

    fn cancel(&mut self) {
        if let Err(e) = self.tts.stop() {
            eprintln!("[Speech] Failed to stop utterance: {}", e);
        }
    }

    fn name(&self) -> &'static str {
        "platform synthesizer"
    }
}

fn estimate_duration(text: &str, rate: f32) -> Duration {
    let rate = rate.max(0.25);
    let millis = 350.0 + 90.0 * text.chars().count() as f32;
    Duration::from_millis((millis / rate) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_estimate_scales_with_length_and_rate() {
        let short = estimate_duration("cat", 1.0);
        let long = estimate_duration("extemporaneous", 1.0);
        assert!(long > short);

        let fast = estimate_duration("extemporaneous", 2.0);
        assert!(fast < long);
    }
}
