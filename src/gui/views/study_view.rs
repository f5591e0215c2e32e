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
    speech::{
        SpeakOptions,
        SpeechEngine,
    },
    study::StudySession,
};

pub struct StudyView {
    pub bucket: u32,
    session: Option<StudySession>,
    loading: bool,
    error: Option<String>,
}

impl StudyView {
    pub fn new() -> Self {
        Self { bucket: 1, session: None, loading: false, error: None }
    }

    pub fn begin_loading(&mut self, bucket: u32) {
        self.bucket = bucket;
        self.session = None;
        self.loading = true;
        self.error = None;
    }

    pub fn set_deck(&mut self, result: Result<Vec<WordEntry>, String>) {
        if !self.loading {
            return;
        }
        self.loading = false;
        match result {
            Ok(words) => self.session = Some(StudySession::new(words)),
            Err(e) => self.error = Some(e),
        }
    }

    pub fn on_space_change(&mut self) {
        self.bucket = 1;
        self.session = None;
        self.loading = false;
        self.error = None;
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        space: StudySpace,
        aliases: &BucketAliases,
        speech: &mut SpeechEngine,
        queue: &mut ActionQueue,
    ) {
        let ctx = ui.ctx().clone();
        ui.label(theme.heading(&ctx, "Study"));

        // Bucket selector
        ui.horizontal_wrapped(|ui| {
            for b in 1..=space.bucket_count() {
                let label = aliases
                    .label_for(b)
                    .map(str::to_string)
                    .unwrap_or_else(|| b.to_string());
                if ui.selectable_label(self.bucket == b, label).clicked() && self.bucket != b {
                    queue.push(AppAction::SelectStudyBucket(b));
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
        let Some(session) = &mut self.session else {
            return;
        };

        let bucket_label = aliases
            .label_for(self.bucket)
            .map(str::to_string)
            .unwrap_or_else(|| space.bucket_label(self.bucket));

        if session.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.label(
                    egui::RichText::new(format!("No words in {} yet.", bucket_label))
                        .color(theme.muted(&ctx)),
                );
            });
            return;
        }

        if session.complete() {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.label(egui::RichText::new("Session complete!").size(22.0).strong());
                ui.label(
                    egui::RichText::new(format!("{} — {} words", bucket_label, session.len()))
                        .color(theme.muted(&ctx)),
                );
                ui.add_space(8.0);
                if ui.button("⟲ Restart").clicked() {
                    session.restart();
                }
            });
            return;
        }

        // Progress
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&bucket_label).color(theme.muted(&ctx)));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} / {}",
                        session.position() + 1,
                        session.len()
                    ))
                    .color(theme.muted(&ctx)),
                );
            });
        });
        let progress = (session.position() + 1) as f32 / session.len() as f32;
        ui.add(egui::ProgressBar::new(progress).desired_height(6.0));
        ui.add_space(8.0);

        let Some(current) = session.current().cloned() else {
            return;
        };

        egui::Frame::group(ui.style()).fill(theme.raised_fill(&ctx)).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.set_min_height(180.0);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&current.word).size(28.0).strong());
                if ui.button("🔊").on_hover_text("Pronounce").clicked() {
                    speech.speak(
                        &current.word,
                        SpeakOptions { rate: 0.9, ..Default::default() },
                    );
                }
            });
            ui.add_space(6.0);

            let reveal_label =
                if session.revealed() { "Hide meaning" } else { "Show meaning" };
            if ui.link(reveal_label).clicked() {
                session.toggle_reveal();
            }

            if session.revealed() {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(&current.meaning).size(16.0));
                if let Some(example) = &current.example {
                    ui.label(
                        egui::RichText::new(format!("\u{201c}{}\u{201d}", example))
                            .italics()
                            .color(theme.muted(&ctx)),
                    );
                }
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(session.position() > 0, egui::Button::new("← Prev"))
                .clicked()
            {
                session.prev();
            }
            let next_label = if session.position() + 1 < session.len() {
                "Next →"
            } else {
                "Finish"
            };
            if ui.button(next_label).clicked() {
                session.next();
            }
        });
    }
}

impl Default for StudyView {
    fn default() -> Self {
        Self::new()
    }
}
