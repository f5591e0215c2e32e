use std::time::{
    Duration,
    Instant,
};

use eframe::egui;

use crate::{
    gui::{
        actions::{
            ActionQueue,
            AppAction,
        },
        app::View,
        theme::Theme,
    },
    persistence::prefs::{
        MemoPad,
        MAX_MEMO_TITLE_CHARS,
    },
};

/// How long the "Saved" flash stays visible after an edit.
const SAVED_FLASH: Duration = Duration::from_millis(1200);

/// Freeform memo editor. Every keystroke persists immediately; the flash
/// label is the only acknowledgement.
pub struct MemoView {
    editing_title: bool,
    title_value: String,
    saved_at: Option<Instant>,
}

impl MemoView {
    pub fn new() -> Self {
        Self { editing_title: false, title_value: String::new(), saved_at: None }
    }

    pub fn on_open(&mut self) {
        self.editing_title = false;
        self.saved_at = None;
    }

    pub fn saved_flash_deadline(&self) -> Option<Instant> {
        self.saved_at.map(|at| at + SAVED_FLASH)
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        memos: &mut MemoPad,
        memo_id: &str,
        queue: &mut ActionQueue,
        now: Instant,
    ) {
        let ctx = ui.ctx().clone();

        if ui.link("← Back to memos").clicked() {
            queue.push(AppAction::Navigate(View::Buckets));
        }
        ui.add_space(8.0);

        if memos.get(memo_id).is_none() {
            ui.label(egui::RichText::new("Memo not found.").color(theme.muted(&ctx)));
            return;
        }

        // Title bar
        ui.horizontal(|ui| {
            if self.editing_title {
                let edit = egui::TextEdit::singleline(&mut self.title_value)
                    .char_limit(MAX_MEMO_TITLE_CHARS)
                    .desired_width(220.0);
                let response = ui.add(edit);
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.small_button("Save").clicked() || submitted {
                    memos.rename(memo_id, &self.title_value);
                    queue.push(AppAction::MemoEdited);
                    self.saved_at = Some(now);
                    self.editing_title = false;
                }
                if ui.small_button("✖").clicked() {
                    self.editing_title = false;
                }
            } else {
                let title = memos.get(memo_id).map(|m| m.title.clone()).unwrap_or_default();
                ui.strong(title);
                if ui.small_button("✏").clicked() {
                    self.title_value =
                        memos.get(memo_id).map(|m| m.title.clone()).unwrap_or_default();
                    self.editing_title = true;
                }
            }

            let flash_visible =
                self.saved_at.map(|at| now.duration_since(at) < SAVED_FLASH).unwrap_or(false);
            if flash_visible {
                ui.label(egui::RichText::new("Saved").color(theme.green(&ctx)).small());
            }
        });
        ui.separator();

        // Content: persisted on every change
        let mut content = memos.get(memo_id).map(|m| m.content.clone()).unwrap_or_default();
        let response = ui.add(
            egui::TextEdit::multiline(&mut content)
                .desired_rows(20)
                .desired_width(f32::INFINITY)
                .hint_text("Write anything…"),
        );
        if response.changed() {
            memos.set_content(memo_id, &content);
            queue.push(AppAction::MemoEdited);
            self.saved_at = Some(now);
        }

        ui.label(
            egui::RichText::new("Saved automatically as you type.")
                .color(theme.muted(&ctx))
                .small(),
        );
    }
}

impl Default for MemoView {
    fn default() -> Self {
        Self::new()
    }
}
