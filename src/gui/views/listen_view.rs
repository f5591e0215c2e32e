use std::time::Instant;

use eframe::egui;

use crate::{
    core::{
        StudySpace,
        WordEntry,
    },
    gui::{
        actions::{
            ActionQueue,
            AppAction,
        },
        theme::Theme,
    },
    persistence::prefs::BucketAliases,
    sequencer::{
        Sequencer,
        SequencerCommand,
        SequencerState,
    },
    speech::{
        SpeakOptions,
        SpeechEngine,
        SpeechOutcome,
    },
};

const SPEED_OPTIONS: [(&str, f32); 4] =
    [("0.5×", 0.5), ("0.75×", 0.75), ("1×", 1.0), ("1.25×", 1.25)];

/// Utterance rate = sequencer speed scaled down by this factor.
const UTTERANCE_RATE_SCALE: f32 = 0.85;

/// The listen page: hosts the autoplay sequencer and routes its commands
/// to the speech engine. Leaving the view goes through `teardown`, which
/// cancels speech and timers before the sequencer is dropped.
pub struct ListenView {
    pub source_bucket: Option<u32>,
    sequencer: Option<Sequencer>,
    speed: f32,
    repeat: bool,
    loading: bool,
    error: Option<String>,
}

impl ListenView {
    pub fn new() -> Self {
        Self {
            source_bucket: None,
            sequencer: None,
            speed: 1.0,
            repeat: false,
            loading: false,
            error: None,
        }
    }

    pub fn begin_loading(&mut self, bucket: Option<u32>, speech: &mut SpeechEngine) {
        self.teardown(speech);
        self.source_bucket = bucket;
        self.loading = true;
        self.error = None;
    }

    pub fn set_deck(
        &mut self,
        result: Result<Vec<WordEntry>, String>,
        speech: &mut SpeechEngine,
    ) {
        if !self.loading {
            return;
        }
        self.loading = false;
        match result {
            Ok(words) => {
                let mut sequencer = Sequencer::new(words, speech.has_voice());
                sequencer.set_speed(self.speed);
                sequencer.set_repeat(self.repeat);
                self.sequencer = Some(sequencer);
            }
            Err(e) => self.error = Some(e),
        }
    }

    /// Cancels speech and timers, then drops the sequencer.
    pub fn teardown(&mut self, speech: &mut SpeechEngine) {
        if let Some(sequencer) = &mut self.sequencer {
            let commands = sequencer.shutdown();
            Self::run_commands(commands, self.speed, speech);
        }
        self.sequencer = None;
    }

    pub fn on_space_change(&mut self, speech: &mut SpeechEngine) {
        self.teardown(speech);
        self.source_bucket = None;
        self.loading = false;
        self.error = None;
    }

    /// Per-frame drive: speech completions and timer fires both land here.
    /// Returns the next timer deadline so the app can schedule a repaint.
    pub fn tick(&mut self, now: Instant, speech: &mut SpeechEngine) -> Option<Instant> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = speech.poll() {
            outcomes.push(outcome);
        }

        let sequencer = self.sequencer.as_mut()?;

        for outcome in outcomes {
            let commands = match outcome {
                SpeechOutcome::Completed => sequencer.on_utterance_end(now),
                SpeechOutcome::Failed(_) => sequencer.on_utterance_failed(now),
            };
            Self::run_commands(commands, sequencer.speed(), speech);
        }

        let commands = sequencer.tick(now);
        Self::run_commands(commands, sequencer.speed(), speech);

        sequencer.next_deadline()
    }

    fn run_commands(commands: Vec<SequencerCommand>, speed: f32, speech: &mut SpeechEngine) {
        for command in commands {
            match command {
                SequencerCommand::Speak(text) => speech.speak(
                    &text,
                    SpeakOptions { rate: speed * UTTERANCE_RATE_SCALE, ..Default::default() },
                ),
                SequencerCommand::CancelSpeech => speech.cancel(),
            }
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        space: StudySpace,
        aliases: &BucketAliases,
        speech: &mut SpeechEngine,
        queue: &mut ActionQueue,
        now: Instant,
    ) {
        let ctx = ui.ctx().clone();
        ui.label(theme.heading(&ctx, "Listen"));

        // Source selector
        ui.horizontal_wrapped(|ui| {
            let all_selected = self.source_bucket.is_none();
            if ui.selectable_label(all_selected, "All words").clicked() && !all_selected {
                queue.push(AppAction::SelectListenSource { bucket: None });
            }
            for b in 1..=space.bucket_count() {
                let label = aliases
                    .label_for(b)
                    .map(str::to_string)
                    .unwrap_or_else(|| b.to_string());
                let selected = self.source_bucket == Some(b);
                if ui.selectable_label(selected, label).clicked() && !selected {
                    queue.push(AppAction::SelectListenSource { bucket: Some(b) });
                }
            }
        });

        // Speed + repeat
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Speed").color(theme.muted(&ctx)).small());
            for (label, value) in SPEED_OPTIONS {
                let selected = (self.speed - value).abs() < f32::EPSILON;
                if ui.selectable_label(selected, label).clicked() {
                    self.speed = value;
                    if let Some(sequencer) = &mut self.sequencer {
                        sequencer.set_speed(value);
                    }
                }
            }
            ui.add_space(10.0);
            if ui.selectable_label(self.repeat, "⟲ Repeat").clicked() {
                self.repeat = !self.repeat;
                if let Some(sequencer) = &mut self.sequencer {
                    sequencer.set_repeat(self.repeat);
                }
            }
        });
        ui.separator();

        if let Some(error) = &self.error {
            ui.colored_label(theme.red(&ctx), format!("Failed to load: {}", error));
            return;
        }
        if self.loading {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.add(egui::Spinner::new());
            });
            return;
        }
        let Some(sequencer) = &mut self.sequencer else {
            return;
        };

        if sequencer.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.label(
                    egui::RichText::new("No words to listen to.").color(theme.muted(&ctx)),
                );
            });
            return;
        }

        let len = sequencer.len();
        let display_index = sequencer.position().min(len - 1);
        let state = sequencer.state();

        // Progress
        let source_label = match self.source_bucket {
            Some(b) => aliases
                .label_for(b)
                .map(str::to_string)
                .unwrap_or_else(|| space.bucket_label(b)),
            None => "All words".to_string(),
        };
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(source_label).color(theme.muted(&ctx)));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("{} / {}", display_index + 1, len))
                        .color(theme.muted(&ctx)),
                );
            });
        });
        ui.add(egui::ProgressBar::new((display_index + 1) as f32 / len as f32)
            .desired_height(6.0));
        ui.add_space(8.0);

        let current = sequencer.items()[display_index].clone();

        egui::Frame::group(ui.style()).fill(theme.raised_fill(&ctx)).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.set_min_height(160.0);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&current.word).size(30.0).strong());
                if state == SequencerState::PlayingWord {
                    ui.label(egui::RichText::new("🔊").color(theme.accent(&ctx)));
                }
            });
            ui.add_space(6.0);

            if sequencer.meaning_shown() {
                ui.label(egui::RichText::new(&current.meaning).size(16.0));
                if let Some(example) = &current.example {
                    ui.label(
                        egui::RichText::new(format!("\u{201c}{}\u{201d}", example))
                            .italics()
                            .color(theme.muted(&ctx)),
                    );
                }
            } else if state == SequencerState::Finished {
                ui.label(
                    egui::RichText::new("Finished. Press ▶ to play again.")
                        .color(theme.muted(&ctx)),
                );
            }
        });

        // Transport controls
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(display_index > 0, egui::Button::new("⏮"))
                .clicked()
            {
                let commands = sequencer.jump_to(display_index - 1, now);
                Self::run_commands(commands, sequencer.speed(), speech);
            }

            let play_label = if sequencer.playing() { "⏸" } else { "▶" };
            if ui.button(egui::RichText::new(play_label).size(18.0)).clicked() {
                let commands = sequencer.toggle_play(now);
                Self::run_commands(commands, sequencer.speed(), speech);
            }

            if ui
                .add_enabled(display_index + 1 < len, egui::Button::new("⏭"))
                .clicked()
            {
                let commands = sequencer.jump_to(display_index + 1, now);
                Self::run_commands(commands, sequencer.speed(), speech);
            }
        });

        // Mini-map: one numbered cell per word
        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            for i in 0..len {
                let selected = i == sequencer.position();
                let text = if selected {
                    egui::RichText::new(format!("{}", i + 1)).color(theme.accent(&ctx)).strong()
                } else {
                    egui::RichText::new(format!("{}", i + 1)).small()
                };
                if ui.selectable_label(selected, text).clicked() {
                    let commands = sequencer.jump_to(i, now);
                    Self::run_commands(commands, sequencer.speed(), speech);
                }
            }
        });
    }
}

impl Default for ListenView {
    fn default() -> Self {
        Self::new()
    }
}
