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
        app::View,
        theme::Theme,
    },
    persistence::prefs::BucketAliases,
    speech::{
        SpeakOptions,
        SpeechEngine,
    },
};

pub struct WordDetailView {
    word: Option<WordEntry>,
    loading: bool,
    error: Option<String>,
    not_found: bool,
    delete_armed: bool,
}

impl WordDetailView {
    pub fn new() -> Self {
        Self { word: None, loading: false, error: None, not_found: false, delete_armed: false }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
        self.not_found = false;
        self.word = None;
        self.delete_armed = false;
    }

    pub fn word(&self) -> Option<&WordEntry> {
        self.word.as_ref()
    }

    pub fn set_word(&mut self, result: Result<WordEntry, String>) {
        if !self.loading {
            return;
        }
        self.loading = false;
        match result {
            Ok(word) => self.word = Some(word),
            Err(e) if e == crate::core::TangochoError::NotFound.to_string() => {
                self.not_found = true
            }
            Err(e) => self.error = Some(e),
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
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

        if ui.link("← Back to words").clicked() {
            queue.push(AppAction::Navigate(View::Words));
        }
        ui.add_space(8.0);

        if self.not_found {
            ui.label(egui::RichText::new("Word not found.").color(theme.muted(&ctx)));
            return;
        }
        if let Some(error) = &self.error {
            ui.colored_label(theme.red(&ctx), format!("Failed to load: {}", error));
            return;
        }
        if self.loading {
            ui.add(egui::Spinner::new());
            return;
        }
        let Some(word) = self.word.clone() else {
            return;
        };

        egui::Frame::group(ui.style()).fill(theme.raised_fill(&ctx)).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&word.word).size(32.0).strong());
                if ui.button("🔊").on_hover_text("Pronounce").clicked() {
                    speech.speak(&word.word, SpeakOptions { rate: 0.9, ..Default::default() });
                }
            });
            ui.add_space(6.0);
            ui.label(egui::RichText::new(&word.meaning).size(16.0));

            if let Some(example) = &word.example {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!("\u{201c}{}\u{201d}", example))
                        .italics()
                        .color(theme.muted(&ctx)),
                );
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if let Some(day) = word.study_day {
                    let label = aliases
                        .label_for(day)
                        .map(str::to_string)
                        .unwrap_or_else(|| space.bucket_label(day));
                    ui.label(egui::RichText::new(label).color(theme.accent(&ctx)).small());
                }
                ui.label(
                    egui::RichText::new(format!(
                        "added {}",
                        word.created_at.format("%Y-%m-%d")
                    ))
                    .color(theme.muted(&ctx))
                    .small(),
                );
            });
        });

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("Edit").clicked() {
                queue.push(AppAction::Navigate(View::WordEdit(word.id.clone())));
            }
            if self.delete_armed {
                if ui
                    .button(egui::RichText::new("Confirm delete").color(theme.red(&ctx)))
                    .clicked()
                {
                    queue.push(AppAction::DeleteWord { id: word.id.clone() });
                    self.delete_armed = false;
                }
                if ui.button("Cancel").clicked() {
                    self.delete_armed = false;
                }
            } else if ui.button("Delete").clicked() {
                self.delete_armed = true;
            }
        });
    }
}

impl Default for WordDetailView {
    fn default() -> Self {
        Self::new()
    }
}
