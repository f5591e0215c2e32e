use eframe::egui::{
    self,
    containers,
};

use crate::{
    core::{
        space::PERSONAL_SPACES,
        StudySpace,
    },
    gui::{
        actions::{
            ActionQueue,
            AppAction,
        },
        app::View,
    },
    persistence::prefs::SpaceNames,
};

pub struct TopBar;

pub enum TopBarAction {
    OpenSettings,
}

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        space: StudySpace,
        space_names: &SpaceNames,
        current_view: &View,
        queue: &mut ActionQueue,
    ) -> Option<TopBarAction> {
        let mut action = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);

                let space_label = if space.is_personal() {
                    space_names
                        .name_for(space.owner())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("User {}", space.owner()))
                } else {
                    "TOEIC".to_string()
                };
                ui.menu_button(format!("Space: {}", space_label), |ui| {
                    if ui.button("TOEIC (shared)").clicked() {
                        queue.push(AppAction::SwitchSpace(0));
                    }
                    ui.separator();
                    for user_id in 1..=PERSONAL_SPACES {
                        let name = space_names
                            .name_for(user_id)
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("User {}", user_id));
                        if ui.button(name).clicked() {
                            queue.push(AppAction::SwitchSpace(user_id));
                        }
                    }
                    ui.separator();
                    if ui.button("All spaces…").clicked() {
                        queue.push(AppAction::Navigate(View::Spaces));
                    }
                });

                ui.separator();

                let tabs: [(&str, View); 4] = [
                    ("Buckets", View::Buckets),
                    ("Words", View::Words),
                    ("Study", View::Study),
                    ("Listen", View::Listen),
                ];
                for (label, view) in tabs {
                    let selected = Self::tab_matches(current_view, &view);
                    if ui.selectable_label(selected, label).clicked() && !selected {
                        queue.push(AppAction::Navigate(view));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        action = Some(TopBarAction::OpenSettings);
                    }
                });
            });
        });

        action
    }

    /// Word detail/form pages highlight the Words tab; the memo editor
    /// highlights Buckets, where the memo list lives.
    fn tab_matches(current: &View, tab: &View) -> bool {
        match (current, tab) {
            (View::Words, View::Words)
            | (View::WordDetail(_), View::Words)
            | (View::WordNew, View::Words)
            | (View::WordEdit(_), View::Words) => true,
            (View::Buckets, View::Buckets) | (View::Memo(_), View::Buckets) => true,
            (View::Study, View::Study) => true,
            (View::Listen, View::Listen) => true,
            _ => false,
        }
    }
}
