use eframe::egui;

use crate::api::DEFAULT_BASE_URL;

pub const SETTINGS_KEY: &str = "settings";

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct SettingsData {
    pub api_base_url: String,
    pub dark_mode: bool,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_BASE_URL.to_string(), dark_mode: true }
    }
}

/// Small settings window; returns the new settings when saved so the app
/// can rebuild the store client and persist.
pub struct SettingsWindow {
    open: bool,
    draft: SettingsData,
}

impl SettingsWindow {
    pub fn new() -> Self {
        Self { open: false, draft: SettingsData::default() }
    }

    pub fn open(&mut self, current: SettingsData) {
        self.draft = current;
        self.open = true;
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<SettingsData> {
        if !self.open {
            return None;
        }

        let mut saved = None;
        let mut keep_open = self.open;

        egui::Window::new("Settings")
            .open(&mut keep_open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid").num_columns(2).spacing([12.0, 8.0]).show(
                    ui,
                    |ui| {
                        ui.label("API server");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.draft.api_base_url)
                                .desired_width(220.0),
                        );
                        ui.end_row();

                        ui.label("Dark mode");
                        ui.checkbox(&mut self.draft.dark_mode, "");
                        ui.end_row();
                    },
                );

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        saved = Some(self.draft.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        self.open = false;
                    }
                });
            });

        if !keep_open || saved.is_some() {
            self.open = false;
        }
        saved
    }
}

impl Default for SettingsWindow {
    fn default() -> Self {
        Self::new()
    }
}
