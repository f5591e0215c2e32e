use std::time::{
    Duration,
    Instant,
};

use eframe::egui;
use egui_extras::{
    Column,
    TableBuilder,
};

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
};

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Searchable word list, optionally narrowed to one bucket. The search
/// debounce is a single-slot deadline owned by this view; switching views
/// drops it, so a stale fire after exit cannot happen.
pub struct WordListView {
    query: String,
    debounce: Option<Instant>,
    pub bucket: Option<u32>,
    words: Option<Vec<WordEntry>>,
    loading: bool,
    error: Option<String>,
    delete_armed: Option<String>,
}

impl WordListView {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            debounce: None,
            bucket: None,
            words: None,
            loading: false,
            error: None,
            delete_armed: None,
        }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn set_words(&mut self, result: Result<Vec<WordEntry>, String>) {
        if !self.loading {
            return; // stale: the view moved on since this fetch started
        }
        self.loading = false;
        match result {
            Ok(words) => self.words = Some(words),
            Err(e) => self.error = Some(e),
        }
    }

    pub fn words(&self) -> Option<&Vec<WordEntry>> {
        self.words.as_ref()
    }

    pub fn find(&self, id: &str) -> Option<&WordEntry> {
        self.words.as_ref().and_then(|words| words.iter().find(|w| w.id == id))
    }

    pub fn remove_word(&mut self, id: &str) {
        if let Some(words) = &mut self.words {
            words.retain(|w| w.id != id);
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn current_search(&self) -> Option<String> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn on_space_change(&mut self) {
        self.query.clear();
        self.debounce = None;
        self.bucket = None;
        self.words = None;
        self.loading = false;
        self.error = None;
        self.delete_armed = None;
    }

    /// Cancels any pending debounce; called when the view is left.
    pub fn cancel_debounce(&mut self) {
        self.debounce = None;
    }

    /// Fires the debounced search once its deadline passes. Returns the
    /// committed search text for the app to fetch with.
    pub fn tick(&mut self, now: Instant) -> Option<Option<String>> {
        match self.debounce {
            Some(deadline) if now >= deadline => {
                self.debounce = None;
                Some(self.current_search())
            }
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        space: StudySpace,
        aliases: &BucketAliases,
        queue: &mut ActionQueue,
        now: Instant,
    ) {
        let ctx = ui.ctx().clone();

        ui.horizontal(|ui| {
            ui.label(theme.heading(&ctx, "Words"));
            if let Some(words) = &self.words {
                ui.label(
                    egui::RichText::new(format!("{} words", words.len()))
                        .color(theme.muted(&ctx)),
                );
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("+ Add Word").clicked() {
                    queue.push(AppAction::Navigate(View::WordNew));
                }
            });
        });

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("Search words or meanings…")
                    .desired_width(240.0),
            );
            if response.changed() {
                self.debounce = Some(now + SEARCH_DEBOUNCE);
            }

            if let Some(bucket) = self.bucket {
                let label = aliases
                    .label_for(bucket)
                    .map(str::to_string)
                    .unwrap_or_else(|| space.bucket_label(bucket));
                if ui.button(format!("{} ✖", label)).clicked() {
                    self.bucket = None;
                    queue.push(AppAction::SearchCommitted(self.current_search()));
                }
            }
        });
        ui.separator();

        if let Some(error) = &self.error {
            ui.colored_label(theme.red(&ctx), format!("Failed to load words: {}", error));
        }

        if self.loading {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.add(egui::Spinner::new());
            });
            return;
        }

        let Some(words) = self.words.clone() else {
            return;
        };

        if words.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.label(egui::RichText::new("No words found.").color(theme.muted(&ctx)));
            });
            return;
        }

        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(140.0))
            .column(Column::remainder())
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(110.0))
            .header(22.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Word");
                });
                header.col(|ui| {
                    ui.strong("Meaning");
                });
                header.col(|ui| {
                    ui.strong(space.bucket_noun());
                });
                header.col(|_ui| {});
            })
            .body(|body| {
                body.rows(26.0, words.len(), |mut row| {
                    let entry = &words[row.index()];
                    row.col(|ui| {
                        if ui.link(egui::RichText::new(&entry.word).strong()).clicked() {
                            queue.push(AppAction::Navigate(View::WordDetail(entry.id.clone())));
                        }
                    });
                    row.col(|ui| {
                        let meaning: String = entry.meaning.chars().take(60).collect();
                        ui.label(egui::RichText::new(meaning).color(theme.muted(&ctx)));
                    });
                    row.col(|ui| {
                        if let Some(day) = entry.study_day {
                            let label = aliases
                                .label_for(day)
                                .map(str::to_string)
                                .unwrap_or_else(|| space.bucket_label(day));
                            ui.label(
                                egui::RichText::new(label).color(theme.accent(&ctx)).small(),
                            );
                        }
                    });
                    row.col(|ui| {
                        if self.delete_armed.as_deref() == Some(entry.id.as_str()) {
                            if ui
                                .button(egui::RichText::new("Confirm").color(theme.red(&ctx)))
                                .clicked()
                            {
                                queue.push(AppAction::DeleteWord { id: entry.id.clone() });
                                self.delete_armed = None;
                            }
                            if ui.small_button("✖").clicked() {
                                self.delete_armed = None;
                            }
                        } else if ui.small_button("Delete").clicked() {
                            self.delete_armed = Some(entry.id.clone());
                        }
                    });
                });
            });
    }
}

impl Default for WordListView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_fires_only_after_the_deadline() {
        let start = Instant::now();
        let mut view = WordListView::new();
        view.query = "app".to_string();
        view.debounce = Some(start + SEARCH_DEBOUNCE);

        assert!(view.tick(start).is_none());
        assert!(view.tick(start + Duration::from_millis(299)).is_none());

        let fired = view.tick(start + SEARCH_DEBOUNCE);
        assert_eq!(fired, Some(Some("app".to_string())));
        assert!(view.tick(start + Duration::from_secs(1)).is_none(), "single-shot");
    }

    #[test]
    fn cancelled_debounce_never_fires() {
        let start = Instant::now();
        let mut view = WordListView::new();
        view.debounce = Some(start + SEARCH_DEBOUNCE);
        view.cancel_debounce();
        assert!(view.tick(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn blank_query_commits_as_no_filter() {
        let mut view = WordListView::new();
        view.query = "   ".to_string();
        assert_eq!(view.current_search(), None);
    }
}
