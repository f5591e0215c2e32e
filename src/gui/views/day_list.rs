use eframe::egui;

use crate::{
    core::{
        BucketSummary,
        StudySpace,
    },
    gui::{
        actions::{
            ActionQueue,
            AppAction,
        },
        app::View,
        theme::Theme,
    },
    persistence::prefs::{
        BucketAliases,
        MemoPad,
        MAX_ALIAS_CHARS,
        MAX_MEMOS,
    },
};

/// The bucket grid: 30 study days for the shared curriculum, 10 wordbooks
/// for a personal space. Personal spaces also get the memo tab.
pub struct DayListView {
    summaries: Option<Vec<BucketSummary>>,
    loading: bool,
    error: Option<String>,
    rename_target: Option<u32>,
    rename_value: String,
    memo_tab: bool,
}

impl DayListView {
    pub fn new() -> Self {
        Self {
            summaries: None,
            loading: false,
            error: None,
            rename_target: None,
            rename_value: String::new(),
            memo_tab: false,
        }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn set_summaries(&mut self, result: Result<Vec<BucketSummary>, String>) {
        if !self.loading {
            return;
        }
        self.loading = false;
        match result {
            Ok(summaries) => self.summaries = Some(summaries),
            Err(e) => self.error = Some(e),
        }
    }

    pub fn summaries_mut(&mut self) -> Option<&mut Vec<BucketSummary>> {
        self.summaries.as_mut()
    }

    pub fn on_space_change(&mut self) {
        self.summaries = None;
        self.loading = false;
        self.error = None;
        self.rename_target = None;
        self.memo_tab = false;
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        space: StudySpace,
        aliases: &BucketAliases,
        memos: &MemoPad,
        queue: &mut ActionQueue,
    ) {
        let ctx = ui.ctx().clone();

        ui.horizontal(|ui| {
            let title = if space.is_personal() { "Wordbooks" } else { "Study Days" };
            ui.label(theme.heading(&ctx, title));

            if let Some(summaries) = &self.summaries {
                let total: usize = summaries.iter().map(|s| s.word_count).sum();
                ui.label(
                    egui::RichText::new(format!("{} words", total)).color(theme.muted(&ctx)),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("+ Add Word").clicked() {
                    queue.push(AppAction::Navigate(View::WordNew));
                }
            });
        });

        if space.is_personal() {
            ui.horizontal(|ui| {
                if ui.selectable_label(!self.memo_tab, "Wordbooks").clicked() {
                    self.memo_tab = false;
                }
                if ui.selectable_label(self.memo_tab, "Memos").clicked() {
                    self.memo_tab = true;
                }
            });
        }
        ui.separator();

        if self.memo_tab && space.is_personal() {
            self.show_memos(ui, theme, memos, queue);
            return;
        }

        if let Some(error) = &self.error {
            ui.colored_label(theme.red(&ctx), format!("Failed to load: {}", error));
            return;
        }

        if self.loading || self.summaries.is_none() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.add(egui::Spinner::new());
            });
            return;
        }

        let summaries = self.summaries.clone().unwrap_or_default();
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("bucket_grid").num_columns(4).spacing([10.0, 10.0]).show(ui, |ui| {
                for (i, summary) in summaries.iter().enumerate() {
                    self.show_bucket_card(ui, theme, space, aliases, summary, queue);
                    if (i + 1) % 4 == 0 {
                        ui.end_row();
                    }
                }
            });
        });
    }

    fn show_bucket_card(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        space: StudySpace,
        aliases: &BucketAliases,
        summary: &BucketSummary,
        queue: &mut ActionQueue,
    ) {
        let ctx = ui.ctx().clone();
        let bucket = summary.day_number;
        let label = aliases
            .label_for(bucket)
            .map(str::to_string)
            .unwrap_or_else(|| space.bucket_label(bucket));

        egui::Frame::group(ui.style()).fill(theme.raised_fill(&ctx)).show(ui, |ui| {
            ui.set_min_width(150.0);
            ui.vertical(|ui| {
                if self.rename_target == Some(bucket) {
                    ui.horizontal(|ui| {
                        let edit = egui::TextEdit::singleline(&mut self.rename_value)
                            .char_limit(MAX_ALIAS_CHARS)
                            .desired_width(100.0);
                        let response = ui.add(edit);
                        let submitted =
                            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        if ui.small_button("Save").clicked() || submitted {
                            queue.push(AppAction::RenameBucket {
                                bucket,
                                label: self.rename_value.clone(),
                            });
                            self.rename_target = None;
                        }
                        if ui.small_button("✖").clicked() {
                            self.rename_target = None;
                        }
                    });
                } else {
                    ui.horizontal(|ui| {
                        ui.strong(&label);
                        if space.is_personal() && ui.small_button("✏").clicked() {
                            self.rename_target = Some(bucket);
                            self.rename_value =
                                aliases.label_for(bucket).unwrap_or_default().to_string();
                        }
                    });
                }

                let count_text = if summary.word_count == 0 {
                    "no words".to_string()
                } else if summary.word_count == 1 {
                    "1 word".to_string()
                } else {
                    format!("{} words", summary.word_count)
                };
                let count_color = if summary.word_count > 0 {
                    theme.accent(&ctx)
                } else {
                    theme.muted(&ctx)
                };
                ui.label(egui::RichText::new(count_text).color(count_color).small());

                ui.horizontal(|ui| {
                    if ui.small_button("Words").clicked() {
                        queue.push(AppAction::OpenBucket { bucket });
                    }
                    let has_words = summary.word_count > 0;
                    if ui
                        .add_enabled(has_words, egui::Button::new("Study").small())
                        .clicked()
                    {
                        queue.push(AppAction::SelectStudyBucket(bucket));
                    }
                    if ui
                        .add_enabled(has_words, egui::Button::new("Listen").small())
                        .clicked()
                    {
                        queue.push(AppAction::SelectListenSource { bucket: Some(bucket) });
                    }
                });
            });
        });
    }

    fn show_memos(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        memos: &MemoPad,
        queue: &mut ActionQueue,
    ) {
        let ctx = ui.ctx().clone();

        ui.horizontal(|ui| {
            let can_create = !memos.is_full();
            if ui.add_enabled(can_create, egui::Button::new("+ New Memo")).clicked() {
                queue.push(AppAction::CreateMemo {
                    title: format!("Memo {}", memos.len() + 1),
                });
            }
            ui.label(
                egui::RichText::new(format!("{} / {}", memos.len(), MAX_MEMOS))
                    .color(theme.muted(&ctx)),
            );
        });
        ui.add_space(6.0);

        if memos.is_empty() {
            ui.label(egui::RichText::new("No memos yet.").color(theme.muted(&ctx)));
            return;
        }

        for memo in memos.memos() {
            ui.horizontal(|ui| {
                if ui.button(&memo.title).clicked() {
                    queue.push(AppAction::Navigate(View::Memo(memo.id.clone())));
                }
                let preview: String = memo.content.chars().take(40).collect();
                ui.label(egui::RichText::new(preview).color(theme.muted(&ctx)).small());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Delete").clicked() {
                        queue.push(AppAction::DeleteMemo { id: memo.id.clone() });
                    }
                });
            });
        }
    }
}

impl Default for DayListView {
    fn default() -> Self {
        Self::new()
    }
}
