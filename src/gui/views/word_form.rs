use eframe::egui;

use crate::{
    core::{
        StudySpace,
        WordDraft,
        WordEntry,
        WordPatch,
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
};

/// Create/edit form. Word and meaning are required and validated here
/// before anything is submitted; the server is never asked to reject an
/// empty field.
pub struct WordFormView {
    editing: Option<String>,
    word: String,
    meaning: String,
    example: String,
    bucket: Option<u32>,
    loading: bool,
    saving: bool,
    error: Option<String>,
}

impl WordFormView {
    pub fn new() -> Self {
        Self {
            editing: None,
            word: String::new(),
            meaning: String::new(),
            example: String::new(),
            bucket: None,
            loading: false,
            saving: false,
            error: None,
        }
    }

    pub fn open_blank(&mut self, bucket: Option<u32>) {
        *self = Self::new();
        self.bucket = bucket;
    }

    pub fn open_for_edit(&mut self, id: &str) {
        *self = Self::new();
        self.editing = Some(id.to_string());
        self.loading = true;
    }

    pub fn set_word(&mut self, result: Result<WordEntry, String>) {
        if !self.loading {
            return;
        }
        self.loading = false;
        match result {
            Ok(word) => {
                self.word = word.word;
                self.meaning = word.meaning;
                self.example = word.example.unwrap_or_default();
                self.bucket = word.study_day;
            }
            Err(e) => self.error = Some(e),
        }
    }

    pub fn set_save_error(&mut self, message: String) {
        self.saving = false;
        self.error = Some(message);
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        space: StudySpace,
        aliases: &BucketAliases,
        queue: &mut ActionQueue,
    ) {
        let ctx = ui.ctx().clone();

        if ui.link("← Back").clicked() {
            queue.push(AppAction::Navigate(View::Words));
        }
        ui.add_space(8.0);

        let title = if self.is_editing() { "Edit Word" } else { "New Word" };
        ui.label(theme.heading(&ctx, title));
        ui.add_space(6.0);

        if self.loading {
            ui.add(egui::Spinner::new());
            return;
        }

        egui::Grid::new("word_form").num_columns(2).spacing([12.0, 10.0]).show(ui, |ui| {
            ui.label("Word *");
            ui.add(egui::TextEdit::singleline(&mut self.word).desired_width(280.0));
            ui.end_row();

            ui.label("Meaning *");
            ui.add(
                egui::TextEdit::multiline(&mut self.meaning)
                    .desired_rows(2)
                    .desired_width(280.0),
            );
            ui.end_row();

            ui.label("Example");
            ui.add(
                egui::TextEdit::multiline(&mut self.example)
                    .desired_rows(2)
                    .desired_width(280.0),
            );
            ui.end_row();

            ui.label(space.bucket_noun());
            let selected_label = match self.bucket {
                Some(b) => aliases
                    .label_for(b)
                    .map(str::to_string)
                    .unwrap_or_else(|| space.bucket_label(b)),
                None => "Unassigned".to_string(),
            };
            egui::ComboBox::from_id_salt("bucket_select")
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.bucket, None, "Unassigned");
                    for b in 1..=space.bucket_count() {
                        let label = aliases
                            .label_for(b)
                            .map(str::to_string)
                            .unwrap_or_else(|| space.bucket_label(b));
                        ui.selectable_value(&mut self.bucket, Some(b), label);
                    }
                });
            ui.end_row();
        });

        if let Some(error) = &self.error {
            ui.add_space(4.0);
            ui.colored_label(theme.red(&ctx), error);
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let save_label = if self.saving { "Saving…" } else { "Save" };
            if ui.add_enabled(!self.saving, egui::Button::new(save_label)).clicked() {
                self.submit(queue);
            }
            if ui.button("Cancel").clicked() {
                queue.push(AppAction::Navigate(View::Words));
            }
        });
    }

    fn submit(&mut self, queue: &mut ActionQueue) {
        let word = self.word.trim().to_string();
        let meaning = self.meaning.trim().to_string();
        if word.is_empty() {
            self.error = Some("Word is required.".to_string());
            return;
        }
        if meaning.is_empty() {
            self.error = Some("Meaning is required.".to_string());
            return;
        }

        self.error = None;
        self.saving = true;
        let example = {
            let trimmed = self.example.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        match &self.editing {
            Some(id) => queue.push(AppAction::SubmitUpdate {
                id: id.clone(),
                patch: WordPatch {
                    word: Some(word),
                    meaning: Some(meaning),
                    example,
                    study_day: self.bucket,
                },
            }),
            None => queue.push(AppAction::SubmitCreate(WordDraft {
                word,
                meaning,
                example,
                study_day: self.bucket,
                user_id: None,
            })),
        }
    }
}

impl Default for WordFormView {
    fn default() -> Self {
        Self::new()
    }
}
