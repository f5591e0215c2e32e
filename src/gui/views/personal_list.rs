use eframe::egui;

use crate::{
    core::{
        space::PERSONAL_SPACES,
        OwnerSpaceSummary,
    },
    gui::{
        actions::{
            ActionQueue,
            AppAction,
        },
        theme::Theme,
    },
    persistence::prefs::{
        SpaceNames,
        MAX_ALIAS_CHARS,
    },
};

/// Overview of the 10 personal spaces with word counts and editable
/// display names.
pub struct PersonalListView {
    summaries: Option<Vec<OwnerSpaceSummary>>,
    loading: bool,
    error: Option<String>,
    rename_target: Option<u32>,
    rename_value: String,
}

impl PersonalListView {
    pub fn new() -> Self {
        Self {
            summaries: None,
            loading: false,
            error: None,
            rename_target: None,
            rename_value: String::new(),
        }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn set_summaries(&mut self, result: Result<Vec<OwnerSpaceSummary>, String>) {
        if !self.loading {
            return;
        }
        self.loading = false;
        match result {
            Ok(summaries) => self.summaries = Some(summaries),
            Err(e) => self.error = Some(e),
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        space_names: &SpaceNames,
        queue: &mut ActionQueue,
    ) {
        let ctx = ui.ctx().clone();
        ui.label(theme.heading(&ctx, "Personal Spaces"));
        ui.separator();

        if let Some(error) = &self.error {
            ui.colored_label(theme.red(&ctx), format!("Failed to load: {}", error));
            return;
        }
        if self.loading || self.summaries.is_none() {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.add(egui::Spinner::new());
            });
            return;
        }

        let summaries = self.summaries.clone().unwrap_or_default();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for summary in &summaries {
                self.show_space_row(ui, theme, space_names, summary, queue);
                ui.separator();
            }

            // The API only reports spaces that exist server-side; fill out
            // the full 1..=10 range so empty spaces stay reachable.
            let known: Vec<u32> = summaries.iter().map(|s| s.user_id).collect();
            for user_id in 1..=PERSONAL_SPACES {
                if !known.contains(&user_id) {
                    let summary = OwnerSpaceSummary { user_id, word_count: 0 };
                    self.show_space_row(ui, theme, space_names, &summary, queue);
                    ui.separator();
                }
            }
        });
    }

    fn show_space_row(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        space_names: &SpaceNames,
        summary: &OwnerSpaceSummary,
        queue: &mut ActionQueue,
    ) {
        let ctx = ui.ctx().clone();
        let user_id = summary.user_id;
        let name = space_names
            .name_for(user_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("User {}", user_id));

        ui.horizontal(|ui| {
            if self.rename_target == Some(user_id) {
                let edit = egui::TextEdit::singleline(&mut self.rename_value)
                    .char_limit(MAX_ALIAS_CHARS)
                    .desired_width(140.0);
                let response = ui.add(edit);
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.small_button("Save").clicked() || submitted {
                    queue.push(AppAction::RenameSpace {
                        user_id,
                        name: self.rename_value.clone(),
                    });
                    self.rename_target = None;
                }
                if ui.small_button("✖").clicked() {
                    self.rename_target = None;
                }
            } else {
                if ui.link(egui::RichText::new(&name).strong().size(16.0)).clicked() {
                    queue.push(AppAction::SwitchSpace(user_id));
                }
                if ui.small_button("✏").clicked() {
                    self.rename_target = Some(user_id);
                    self.rename_value =
                        space_names.name_for(user_id).unwrap_or_default().to_string();
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let count_text = match summary.word_count {
                    0 => "no words".to_string(),
                    1 => "1 word".to_string(),
                    n => format!("{} words", n),
                };
                let color = if summary.word_count > 0 {
                    theme.accent(&ctx)
                } else {
                    theme.muted(&ctx)
                };
                ui.label(egui::RichText::new(count_text).color(color));
            });
        });
    }
}

impl Default for PersonalListView {
    fn default() -> Self {
        Self::new()
    }
}
