//! Speech playback for word pronunciation.
//!
//! Two backends behind one engine: the platform synthesizer (primary,
//! `platform-tts` feature) and a remote TTS endpoint played through rodio
//! (fallback, `audio` feature). The engine enforces at most one active
//! utterance (starting a new one is always a cancel-then-start) and
//! reports completion/failure events that the GUI polls each frame, the
//! same way task results are polled. Built without either feature the
//! engine simply reports no voice and the sequencer paces itself with
//! timers.

#[cfg(feature = "platform-tts")]
pub mod platform;
#[cfg(feature = "audio")]
pub mod remote;

use std::sync::mpsc::{
    self,
    Receiver,
    Sender,
};

use crate::core::TangochoError;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeakOptions {
    /// BCP-47-ish hint, e.g. "en-US". Backends that enumerate voices use
    /// the primary subtag to pick one.
    pub language_hint: String,
    /// Playback rate multiplier, 1.0 = the backend's normal rate.
    pub rate: f32,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self { language_hint: "en-US".to_string(), rate: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutcome {
    Completed,
    Failed(String),
}

/// `(utterance id, outcome)` posted by backends. Ids let the engine drop
/// events from utterances that were cancelled or superseded.
pub type UtteranceEvent = (u64, SpeechOutcome);

/// One synthesis backend. Completion is reported asynchronously through
/// the event channel handed to the backend at construction.
pub trait SpeechBackend {
    fn speak(
        &mut self,
        id: u64,
        text: &str,
        options: &SpeakOptions,
    ) -> Result<(), TangochoError>;

    fn cancel(&mut self);

    fn name(&self) -> &'static str;
}

struct InFlight {
    id: u64,
    text: String,
    options: SpeakOptions,
    on_fallback: bool,
}

pub struct SpeechEngine {
    primary: Option<Box<dyn SpeechBackend>>,
    fallback: Option<Box<dyn SpeechBackend>>,
    tx: Sender<UtteranceEvent>,
    rx: Receiver<UtteranceEvent>,
    in_flight: Option<InFlight>,
    next_id: u64,
}

impl SpeechEngine {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        #[cfg(feature = "platform-tts")]
        let primary: Option<Box<dyn SpeechBackend>> =
            match platform::PlatformVoice::new(tx.clone()) {
                Ok(voice) => Some(Box::new(voice)),
                Err(e) => {
                    eprintln!("[Speech] Platform synthesizer unavailable: {}", e);
                    None
                }
            };
        #[cfg(not(feature = "platform-tts"))]
        let primary: Option<Box<dyn SpeechBackend>> = None;

        #[cfg(feature = "audio")]
        let fallback: Option<Box<dyn SpeechBackend>> = match remote::RemoteSpeech::new(tx.clone())
        {
            Ok(remote) => Some(Box::new(remote)),
            Err(e) => {
                eprintln!("[Speech] Remote fallback unavailable: {}", e);
                None
            }
        };
        #[cfg(not(feature = "audio"))]
        let fallback: Option<Box<dyn SpeechBackend>> = None;

        if primary.is_none() && fallback.is_none() {
            eprintln!("[Speech] No speech backend; listen mode will pace with timers only.");
        }

        Self { primary, fallback, tx, rx, in_flight: None, next_id: 0 }
    }

    #[cfg(test)]
    fn disconnected() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { primary: None, fallback: None, tx, rx, in_flight: None, next_id: 0 }
    }

    /// Whether any backend can produce audio. The sequencer uses this to
    /// decide between utterance-driven and timer-only pacing.
    pub fn has_voice(&self) -> bool {
        self.primary.is_some() || self.fallback.is_some()
    }

    pub fn is_speaking(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Cancels anything in flight and starts the new utterance.
    pub fn speak(&mut self, text: &str, options: SpeakOptions) {
        self.cancel();

        self.next_id += 1;
        let id = self.next_id;

        if let Some(primary) = &mut self.primary {
            match primary.speak(id, text, &options) {
                Ok(()) => {
                    self.in_flight = Some(InFlight {
                        id,
                        text: text.to_string(),
                        options,
                        on_fallback: false,
                    });
                    return;
                }
                Err(e) => {
                    eprintln!("[Speech] {} speak failed: {}. Trying fallback.", primary.name(), e);
                }
            }
        }

        if let Some(fallback) = &mut self.fallback {
            match fallback.speak(id, text, &options) {
                Ok(()) => {
                    self.in_flight = Some(InFlight {
                        id,
                        text: text.to_string(),
                        options,
                        on_fallback: true,
                    });
                    return;
                }
                Err(e) => {
                    eprintln!("[Speech] {} speak failed: {}", fallback.name(), e);
                }
            }
        }

        // No backend took the utterance; surface the failure through the
        // normal event path so callers handle it in one place.
        self.in_flight =
            Some(InFlight { id, text: text.to_string(), options, on_fallback: true });
        let _ = self.tx.send((id, SpeechOutcome::Failed("no speech backend".to_string())));
    }

    /// Stops any in-flight utterance. A no-op when nothing is playing.
    pub fn cancel(&mut self) {
        if let Some(primary) = &mut self.primary {
            primary.cancel();
        }
        if let Some(fallback) = &mut self.fallback {
            fallback.cancel();
        }
        self.in_flight = None;
    }

    /// Drains backend events, retrying a failed primary utterance once on
    /// the fallback. Returns at most the outcome of the current utterance;
    /// events from superseded utterances are dropped.
    pub fn poll(&mut self) -> Option<SpeechOutcome> {
        while let Ok((id, outcome)) = self.rx.try_recv() {
            let current = match &self.in_flight {
                Some(current) if current.id == id => current,
                _ => continue, // stale: cancelled or superseded
            };

            match outcome {
                SpeechOutcome::Completed => {
                    self.in_flight = None;
                    return Some(SpeechOutcome::Completed);
                }
                SpeechOutcome::Failed(reason) => {
                    if !current.on_fallback {
                        if let Some(fallback) = &mut self.fallback {
                            eprintln!(
                                "[Speech] Primary playback failed ({}). Falling back to {}.",
                                reason,
                                fallback.name()
                            );
                            let text = current.text.clone();
                            let options = current.options.clone();
                            if fallback.speak(id, &text, &options).is_ok() {
                                if let Some(current) = &mut self.in_flight {
                                    current.on_fallback = true;
                                }
                                continue;
                            }
                        }
                    }
                    eprintln!("[Speech] Playback failed: {}", reason);
                    self.in_flight = None;
                    return Some(SpeechOutcome::Failed(reason));
                }
            }
        }
        None
    }
}

impl Default for SpeechEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingBackend {
        tx: Sender<UtteranceEvent>,
        spoken: Vec<String>,
        fail: bool,
    }

    impl SpeechBackend for RecordingBackend {
        fn speak(
            &mut self,
            id: u64,
            text: &str,
            _options: &SpeakOptions,
        ) -> Result<(), TangochoError> {
            self.spoken.push(text.to_string());
            let outcome = if self.fail {
                SpeechOutcome::Failed("synthetic".to_string())
            } else {
                SpeechOutcome::Completed
            };
            let _ = self.tx.send((id, outcome));
            Ok(())
        }

        fn cancel(&mut self) {}

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn engine_with(fail_primary: bool, with_fallback: bool) -> SpeechEngine {
        let mut engine = SpeechEngine::disconnected();
        engine.primary = Some(Box::new(RecordingBackend {
            tx: engine.tx.clone(),
            spoken: Vec::new(),
            fail: fail_primary,
        }));
        if with_fallback {
            engine.fallback = Some(Box::new(RecordingBackend {
                tx: engine.tx.clone(),
                spoken: Vec::new(),
                fail: false,
            }));
        }
        engine
    }

    #[test]
    fn cancel_when_idle_is_a_noop() {
        let mut engine = SpeechEngine::disconnected();
        engine.cancel();
        engine.cancel();
        assert!(!engine.is_speaking());
        assert!(engine.poll().is_none());
    }

    #[test]
    fn speak_without_backends_reports_failure() {
        let mut engine = SpeechEngine::disconnected();
        engine.speak("apple", SpeakOptions::default());
        match engine.poll() {
            Some(SpeechOutcome::Failed(_)) => {}
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!engine.is_speaking());
    }

    #[test]
    fn successful_utterance_completes() {
        let mut engine = engine_with(false, false);
        engine.speak("apple", SpeakOptions::default());
        assert!(engine.is_speaking());
        assert_eq!(engine.poll(), Some(SpeechOutcome::Completed));
        assert!(!engine.is_speaking());
    }

    #[test]
    fn primary_failure_retries_on_the_fallback_once() {
        let mut engine = engine_with(true, true);
        engine.speak("apple", SpeakOptions::default());

        // Primary fails, fallback succeeds: one Completed, no Failed.
        assert_eq!(engine.poll(), Some(SpeechOutcome::Completed));
    }

    #[test]
    fn failure_without_a_fallback_surfaces() {
        let mut engine = engine_with(true, false);
        engine.speak("apple", SpeakOptions::default());
        match engine.poll() {
            Some(SpeechOutcome::Failed(_)) => {}
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn most_recent_start_wins() {
        let mut engine = SpeechEngine::disconnected();
        engine.speak("apple", SpeakOptions::default());
        engine.speak("bench", SpeakOptions::default());

        // The first utterance's event is stale; only the second surfaces.
        let mut outcomes = Vec::new();
        while let Some(outcome) = engine.poll() {
            outcomes.push(outcome);
        }
        assert_eq!(outcomes.len(), 1);
    }

    #[test]
    fn stale_events_are_dropped() {
        let mut engine = SpeechEngine::disconnected();
        let tx = engine.tx.clone();
        tx.send((99, SpeechOutcome::Completed)).unwrap();
        assert!(engine.poll().is_none());
    }

    #[test]
    fn cancelled_utterance_never_reports() {
        let mut engine = SpeechEngine::disconnected();
        engine.speak("apple", SpeakOptions::default());
        engine.cancel();
        assert!(engine.poll().is_none());
    }
}
