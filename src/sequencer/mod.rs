//! The listen-mode autoplay state machine.
//!
//! Drives an ordered word list through word → gap → meaning → advance
//! cycles. The sequencer owns no clock and no audio: callers inject
//! `Instant`s and forward the returned commands to the speech engine,
//! which keeps every transition deterministic and testable.
//!
//! Timer discipline: a single-slot pending timer. Entering any phase
//! overwrites the slot, so two transitions can never race. Deadlines are
//! fixed at schedule time; a speed change only affects timers scheduled
//! after it.

#[cfg(test)]
mod sequencer_tests;

use std::time::{
    Duration,
    Instant,
};

use crate::core::WordEntry;

/// Pause between the spoken word and the meaning reveal.
pub const GAP_AFTER_WORD: Duration = Duration::from_millis(800);
/// How long the meaning stays up before advancing.
pub const MEANING_DISPLAY: Duration = Duration::from_millis(2500);
/// Word-phase duration when no speech backend exists at all.
pub const SILENT_WORD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Word,
    Gap,
    Meaning,
}

/// Observable state, combining phase, playing flag and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    PlayingWord,
    GapAfterWord,
    ShowingMeaning,
    Finished,
}

/// Effects for the caller to execute. The sequencer never touches the
/// speech engine directly.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerCommand {
    Speak(String),
    CancelSpeech,
}

#[derive(Debug, Clone, Copy)]
enum TimerFire {
    RevealMeaning,
    Advance,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    deadline: Instant,
    fire: TimerFire,
}

pub struct Sequencer {
    items: Vec<WordEntry>,
    position: usize,
    phase: Phase,
    playing: bool,
    speed: f32,
    repeat: bool,
    speech_available: bool,
    pending: Option<PendingTimer>,
}

impl Sequencer {
    pub fn new(items: Vec<WordEntry>, speech_available: bool) -> Self {
        Self {
            items,
            position: 0,
            phase: Phase::Word,
            playing: false,
            speed: 1.0,
            repeat: false,
            speech_available,
            pending: None,
        }
    }

    pub fn items(&self) -> &[WordEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&WordEntry> {
        self.items.get(self.position)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// Meaning is visible during the meaning phase, and kept visible while
    /// paused mid-list so the user can read at leisure.
    pub fn meaning_shown(&self) -> bool {
        self.phase == Phase::Meaning
    }

    pub fn state(&self) -> SequencerState {
        if self.is_empty() {
            return SequencerState::Idle;
        }
        if self.position >= self.items.len() {
            return SequencerState::Finished;
        }
        if !self.playing {
            return SequencerState::Idle;
        }
        match self.phase {
            Phase::Word => SequencerState::PlayingWord,
            Phase::Gap => SequencerState::GapAfterWord,
            Phase::Meaning => SequencerState::ShowingMeaning,
        }
    }

    /// When the next timer fires, if one is scheduled. The GUI uses this
    /// to request a repaint at the right moment.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|t| t.deadline)
    }

    /// Takes effect on the next scheduled timer or utterance, never on one
    /// already in flight.
    pub fn set_speed(&mut self, speed: f32) {
        if speed > 0.0 {
            self.speed = speed;
        }
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    pub fn toggle_play(&mut self, now: Instant) -> Vec<SequencerCommand> {
        if self.is_empty() {
            return Vec::new();
        }
        if self.playing {
            self.playing = false;
            self.pending = None;
            return vec![SequencerCommand::CancelSpeech];
        }
        if self.position >= self.items.len() {
            self.position = 0;
        }
        self.playing = true;
        self.enter_word(now)
    }

    /// Manual navigation: cancels utterance and timers, lands on `index`
    /// in the word phase, and resumes playback only if already playing.
    pub fn jump_to(&mut self, index: usize, now: Instant) -> Vec<SequencerCommand> {
        if index >= self.items.len() {
            return Vec::new();
        }
        self.pending = None;
        self.position = index;
        self.phase = Phase::Word;

        let mut commands = vec![SequencerCommand::CancelSpeech];
        if self.playing {
            commands.extend(self.enter_word(now));
        }
        commands
    }

    /// The current utterance finished playing.
    pub fn on_utterance_end(&mut self, now: Instant) -> Vec<SequencerCommand> {
        if !self.playing || self.phase != Phase::Word || self.position >= self.items.len() {
            return Vec::new();
        }
        self.phase = Phase::Gap;
        self.schedule(now, GAP_AFTER_WORD, TimerFire::RevealMeaning);
        Vec::new()
    }

    /// The current utterance failed. The engine already exhausted its
    /// fallback, so pacing continues as if the word had been spoken.
    /// A TTS failure degrades audio, not the session.
    pub fn on_utterance_failed(&mut self, now: Instant) -> Vec<SequencerCommand> {
        self.on_utterance_end(now)
    }

    /// Fires the pending timer if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Vec<SequencerCommand> {
        let Some(timer) = self.pending else {
            return Vec::new();
        };
        if now < timer.deadline {
            return Vec::new();
        }
        self.pending = None;
        match timer.fire {
            TimerFire::RevealMeaning => {
                self.phase = Phase::Meaning;
                self.schedule(now, MEANING_DISPLAY, TimerFire::Advance);
                Vec::new()
            }
            TimerFire::Advance => self.advance(now),
        }
    }

    /// View teardown: everything stops before the sequencer is dropped.
    pub fn shutdown(&mut self) -> Vec<SequencerCommand> {
        self.playing = false;
        self.pending = None;
        vec![SequencerCommand::CancelSpeech]
    }

    fn enter_word(&mut self, now: Instant) -> Vec<SequencerCommand> {
        self.phase = Phase::Word;
        self.pending = None;

        let Some(entry) = self.items.get(self.position) else {
            return Vec::new();
        };
        let word = entry.word.clone();

        if self.speech_available {
            vec![SequencerCommand::Speak(word)]
        } else {
            // No speech capability anywhere: pace the word phase with a
            // plain timer and skip the post-utterance gap.
            self.schedule(now, SILENT_WORD, TimerFire::RevealMeaning);
            Vec::new()
        }
    }

    fn advance(&mut self, now: Instant) -> Vec<SequencerCommand> {
        let next = self.position + 1;
        if next < self.items.len() {
            self.position = next;
            return self.enter_word(now);
        }
        if self.repeat {
            self.position = 0;
            return self.enter_word(now);
        }
        // Terminal: position parks one past the last item, nothing is
        // scheduled, and the next play press restarts from zero.
        self.position = self.items.len();
        self.playing = false;
        self.phase = Phase::Word;
        self.pending = None;
        Vec::new()
    }

    fn schedule(&mut self, now: Instant, base: Duration, fire: TimerFire) {
        let deadline = now + base.div_f32(self.speed);
        self.pending = Some(PendingTimer { deadline, fire });
    }
}
