use std::time::Instant;

use eframe::egui;

use crate::{
    api::WordStore,
    core::{
        tasks::{
            DeckDest,
            TaskManager,
            TaskResult,
        },
        BucketSummary,
        StudySpace,
    },
    gui::{
        actions::{
            ActionQueue,
            AppAction,
        },
        settings::{
            SettingsData,
            SettingsWindow,
            SETTINGS_KEY,
        },
        theme::{
            set_theme,
            Theme,
        },
        top_bar::{
            TopBar,
            TopBarAction,
        },
        views::{
            DayListView,
            ListenView,
            MemoView,
            PersonalListView,
            StudyView,
            WordDetailView,
            WordFormView,
            WordListView,
        },
    },
    persistence::{
        load_json_or_default,
        prefs::{
            BucketAliases,
            MemoPad,
            SpaceNames,
            SPACE_NAMES_KEY,
        },
        save_json,
        FileStore,
        PreferenceStore,
    },
    speech::SpeechEngine,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Buckets,
    Words,
    WordDetail(String),
    WordNew,
    WordEdit(String),
    Study,
    Listen,
    Memo(String),
    Spaces,
}

pub struct TangochoApp {
    store: WordStore,
    space: StudySpace,
    view: View,

    // Configuration
    settings: SettingsData,
    settings_window: SettingsWindow,
    prefs: Box<dyn PreferenceStore>,
    aliases: BucketAliases,
    memos: MemoPad,
    space_names: SpaceNames,

    // UI
    theme: Theme,
    queue: ActionQueue,

    // Views
    buckets: DayListView,
    words: WordListView,
    detail: WordDetailView,
    form: WordFormView,
    study: StudyView,
    listen: ListenView,
    memo: MemoView,
    spaces: PersonalListView,

    // External services
    speech: SpeechEngine,
    task_manager: TaskManager,
}

impl TangochoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = Theme::default();
        set_theme(&cc.egui_ctx, theme.clone());
        cc.egui_ctx.set_zoom_factor(cc.egui_ctx.zoom_factor() + 0.2);

        let prefs: Box<dyn PreferenceStore> = Box::new(FileStore::new());
        let settings: SettingsData = load_json_or_default(prefs.as_ref(), SETTINGS_KEY);

        cc.egui_ctx.set_theme(if settings.dark_mode {
            egui::Theme::Dark
        } else {
            egui::Theme::Light
        });

        let space = StudySpace::shared();
        let aliases: BucketAliases = load_json_or_default(prefs.as_ref(), &space.alias_key());
        let memos: MemoPad = load_json_or_default(prefs.as_ref(), &space.memo_key());
        let space_names: SpaceNames = load_json_or_default(prefs.as_ref(), SPACE_NAMES_KEY);

        let store = WordStore::new(settings.api_base_url.clone());
        let task_manager = TaskManager::new();

        let mut app = Self {
            store,
            space,
            view: View::Buckets,
            settings,
            settings_window: SettingsWindow::new(),
            prefs,
            aliases,
            memos,
            space_names,
            theme,
            queue: ActionQueue::new(),
            buckets: DayListView::new(),
            words: WordListView::new(),
            detail: WordDetailView::new(),
            form: WordFormView::new(),
            study: StudyView::new(),
            listen: ListenView::new(),
            memo: MemoView::new(),
            spaces: PersonalListView::new(),
            speech: SpeechEngine::new(),
            task_manager,
        };

        app.buckets.begin_loading();
        app.task_manager.fetch_buckets(app.store.clone(), app.space);
        app
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::DeckLoaded { dest, result } => match dest {
                DeckDest::WordList => self.words.set_words(result),
                DeckDest::Study => self.study.set_deck(result),
                DeckDest::Listen => self.listen.set_deck(result, &mut self.speech),
            },
            TaskResult::WordLoaded(result) => match &self.view {
                View::WordDetail(_) => self.detail.set_word(result),
                View::WordEdit(_) => self.form.set_word(result),
                _ => {}
            },
            TaskResult::WordSaved(result) => match result {
                Ok(word) => {
                    // Show the saved word right away; no refetch needed.
                    self.view = View::WordDetail(word.id.clone());
                    self.detail.begin_loading();
                    self.detail.set_word(Ok(word));
                }
                Err(e) => self.form.set_save_error(e),
            },
            TaskResult::WordDeleted { id, result } => match result {
                Ok(()) => {
                    let day = self.deleted_word_day(&id);
                    self.words.remove_word(&id);
                    if let Some(summaries) = self.buckets.summaries_mut() {
                        decrement_bucket(summaries, day);
                    }
                    if matches!(self.view, View::WordDetail(_)) {
                        self.navigate(View::Words);
                    }
                }
                Err(e) => match &self.view {
                    View::WordDetail(_) => self.detail.set_error(e),
                    _ => self.words.set_error(e),
                },
            },
            TaskResult::BucketsLoaded(result) => self.buckets.set_summaries(result),
            TaskResult::SummariesLoaded(result) => self.spaces.set_summaries(result),
        }
    }

    /// Bucket of a word that was just deleted, from whichever cache still
    /// holds it.
    fn deleted_word_day(&self, id: &str) -> Option<u32> {
        if let Some(word) = self.detail.word() {
            if word.id == id {
                return word.study_day;
            }
        }
        self.words.find(id).and_then(|w| w.study_day)
    }

    fn navigate(&mut self, view: View) {
        // Teardown first: no timer or utterance outlives its view.
        if matches!(self.view, View::Listen) && !matches!(view, View::Listen) {
            self.listen.teardown(&mut self.speech);
        }
        if matches!(self.view, View::Words) {
            self.words.cancel_debounce();
        }

        self.view = view;

        match self.view.clone() {
            View::Buckets => {
                self.buckets.begin_loading();
                self.task_manager.fetch_buckets(self.store.clone(), self.space);
            }
            View::Words => {
                self.words.begin_loading();
                self.task_manager.fetch_words(
                    self.store.clone(),
                    self.space,
                    self.words.current_search(),
                    self.words.bucket,
                    DeckDest::WordList,
                );
            }
            View::WordDetail(id) => {
                self.detail.begin_loading();
                self.task_manager.fetch_word(self.store.clone(), id);
            }
            View::WordNew => {
                self.form.open_blank(None);
            }
            View::WordEdit(id) => {
                self.form.open_for_edit(&id);
                self.task_manager.fetch_word(self.store.clone(), id);
            }
            View::Study => {
                let bucket = self.study.bucket;
                self.study.begin_loading(bucket);
                self.task_manager.fetch_bucket_words(
                    self.store.clone(),
                    self.space,
                    bucket,
                    DeckDest::Study,
                );
            }
            View::Listen => {
                self.fetch_listen_deck(self.listen.source_bucket);
            }
            View::Memo(_) => {
                self.memo.on_open();
            }
            View::Spaces => {
                self.spaces.begin_loading();
                self.task_manager.fetch_personal_summary(self.store.clone());
            }
        }
    }

    fn fetch_listen_deck(&mut self, bucket: Option<u32>) {
        self.listen.begin_loading(bucket, &mut self.speech);
        match bucket {
            Some(day) => self.task_manager.fetch_bucket_words(
                self.store.clone(),
                self.space,
                day,
                DeckDest::Listen,
            ),
            None => self.task_manager.fetch_words(
                self.store.clone(),
                self.space,
                None,
                None,
                DeckDest::Listen,
            ),
        }
    }

    fn switch_space(&mut self, owner: u32) {
        self.listen.on_space_change(&mut self.speech);
        self.space = if owner == 0 { StudySpace::shared() } else { StudySpace::personal(owner) };

        self.aliases = load_json_or_default(self.prefs.as_ref(), &self.space.alias_key());
        self.memos = load_json_or_default(self.prefs.as_ref(), &self.space.memo_key());

        self.buckets.on_space_change();
        self.words.on_space_change();
        self.study.on_space_change();

        self.navigate(View::Buckets);
    }

    fn apply_action(&mut self, action: AppAction) {
        match action {
            AppAction::Navigate(view) => self.navigate(view),
            AppAction::SwitchSpace(owner) => self.switch_space(owner),

            AppAction::RenameBucket { bucket, label } => {
                self.aliases.set_label(bucket, &label);
                save_json(self.prefs.as_mut(), &self.space.alias_key(), &self.aliases);
            }
            AppAction::RenameSpace { user_id, name } => {
                self.space_names.set_name(user_id, &name);
                save_json(self.prefs.as_mut(), SPACE_NAMES_KEY, &self.space_names);
            }

            AppAction::CreateMemo { title } => match self.memos.create(&title) {
                Ok(memo) => {
                    let id = memo.id.clone();
                    save_json(self.prefs.as_mut(), &self.space.memo_key(), &self.memos);
                    self.navigate(View::Memo(id));
                }
                Err(e) => eprintln!("[Memo] {}", e),
            },
            AppAction::DeleteMemo { id } => {
                self.memos.delete(&id);
                save_json(self.prefs.as_mut(), &self.space.memo_key(), &self.memos);
            }
            AppAction::MemoEdited => {
                save_json(self.prefs.as_mut(), &self.space.memo_key(), &self.memos);
            }

            AppAction::OpenBucket { bucket } => {
                self.words.bucket = Some(bucket);
                self.navigate(View::Words);
            }
            AppAction::SearchCommitted(search) => {
                self.words.begin_loading();
                self.task_manager.fetch_words(
                    self.store.clone(),
                    self.space,
                    search,
                    self.words.bucket,
                    DeckDest::WordList,
                );
            }
            AppAction::DeleteWord { id } => {
                self.task_manager.delete_word(self.store.clone(), id);
            }
            AppAction::SubmitCreate(draft) => {
                self.task_manager.create_word(self.store.clone(), self.space, draft);
            }
            AppAction::SubmitUpdate { id, patch } => {
                self.task_manager.update_word(self.store.clone(), id, patch);
            }

            AppAction::SelectStudyBucket(bucket) => {
                self.study.bucket = bucket;
                if self.view == View::Study {
                    self.study.begin_loading(bucket);
                    self.task_manager.fetch_bucket_words(
                        self.store.clone(),
                        self.space,
                        bucket,
                        DeckDest::Study,
                    );
                } else {
                    self.navigate(View::Study);
                }
            }
            AppAction::SelectListenSource { bucket } => {
                self.listen.source_bucket = bucket;
                if self.view == View::Listen {
                    self.fetch_listen_deck(bucket);
                } else {
                    self.navigate(View::Listen);
                }
            }
        }
    }

    fn apply_settings(&mut self, ctx: &egui::Context, settings: SettingsData) {
        self.settings = settings;
        save_json(self.prefs.as_mut(), SETTINGS_KEY, &self.settings);
        self.store = WordStore::new(self.settings.api_base_url.clone());
        ctx.set_theme(if self.settings.dark_mode {
            egui::Theme::Dark
        } else {
            egui::Theme::Light
        });
    }

    /// Earliest of the pending deadlines, for repaint scheduling.
    fn next_wakeup(&self, listen_deadline: Option<Instant>) -> Option<Instant> {
        let candidates = [
            listen_deadline,
            self.words.next_deadline(),
            self.memo.saved_flash_deadline(),
        ];
        candidates.into_iter().flatten().min()
    }
}

impl eframe::App for TangochoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        for result in self.task_manager.poll_results() {
            self.handle_task_result(result);
        }

        // Drive the sequencer (or just drain speech events when the
        // listen view is closed).
        let listen_deadline = if self.view == View::Listen {
            self.listen.tick(now, &mut self.speech)
        } else {
            while self.speech.poll().is_some() {}
            None
        };

        if self.view == View::Words {
            if let Some(search) = self.words.tick(now) {
                self.queue.push(AppAction::SearchCommitted(search));
            }
        }

        if let Some(action) =
            TopBar::show(ctx, self.space, &self.space_names, &self.view, &mut self.queue)
        {
            match action {
                TopBarAction::OpenSettings => self.settings_window.open(self.settings.clone()),
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.view.clone() {
            View::Buckets => self.buckets.show(
                ui,
                &self.theme,
                self.space,
                &self.aliases,
                &self.memos,
                &mut self.queue,
            ),
            View::Words => self.words.show(
                ui,
                &self.theme,
                self.space,
                &self.aliases,
                &mut self.queue,
                now,
            ),
            View::WordDetail(_) => self.detail.show(
                ui,
                &self.theme,
                self.space,
                &self.aliases,
                &mut self.speech,
                &mut self.queue,
            ),
            View::WordNew | View::WordEdit(_) => {
                self.form.show(ui, &self.theme, self.space, &self.aliases, &mut self.queue)
            }
            View::Study => self.study.show(
                ui,
                &self.theme,
                self.space,
                &self.aliases,
                &mut self.speech,
                &mut self.queue,
            ),
            View::Listen => self.listen.show(
                ui,
                &self.theme,
                self.space,
                &self.aliases,
                &mut self.speech,
                &mut self.queue,
                now,
            ),
            View::Memo(id) => self.memo.show(
                ui,
                &self.theme,
                &mut self.memos,
                &id,
                &mut self.queue,
                now,
            ),
            View::Spaces => {
                self.spaces.show(ui, &self.theme, &self.space_names, &mut self.queue)
            }
        });

        if let Some(settings) = self.settings_window.show(ctx) {
            self.apply_settings(ctx, settings);
        }

        let actions: Vec<AppAction> = self.queue.drain().collect();
        for action in actions {
            self.apply_action(action);
        }

        // Wake up for the next timer; poll faster while audio is playing
        // so utterance completions are picked up promptly.
        if self.speech.is_speaking() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        } else if let Some(wakeup) = self.next_wakeup(listen_deadline) {
            ctx.request_repaint_after(wakeup.saturating_duration_since(now));
        }
    }
}

/// A deletion only ever touches the bucket the word lived in.
pub(crate) fn decrement_bucket(summaries: &mut [BucketSummary], day: Option<u32>) {
    let Some(day) = day else {
        return;
    };
    if let Some(summary) = summaries.iter_mut().find(|s| s.day_number == day) {
        summary.word_count = summary.word_count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        core::WordEntry,
        gui::views::WordListView,
    };

    fn entry(id: &str, day: Option<u32>) -> WordEntry {
        WordEntry {
            id: id.to_string(),
            word: format!("word-{}", id),
            meaning: "meaning".to_string(),
            example: None,
            study_day: day,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn deleting_a_word_removes_exactly_that_entry() {
        let mut view = WordListView::new();
        view.begin_loading();
        view.set_words(Ok(vec![entry("a", Some(1)), entry("b", Some(1)), entry("c", Some(2))]));

        view.remove_word("b");
        let remaining: Vec<&str> =
            view.words().unwrap().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(remaining, vec!["a", "c"]);
    }

    #[test]
    fn deleting_leaves_other_bucket_counts_untouched() {
        let mut summaries = vec![
            BucketSummary { day_number: 1, word_count: 3 },
            BucketSummary { day_number: 2, word_count: 5 },
        ];

        decrement_bucket(&mut summaries, Some(1));
        assert_eq!(summaries[0].word_count, 2);
        assert_eq!(summaries[1].word_count, 5);

        // Unbucketed word: no count changes at all.
        decrement_bucket(&mut summaries, None);
        assert_eq!(summaries[0].word_count, 2);
        assert_eq!(summaries[1].word_count, 5);
    }

    #[test]
    fn decrement_never_underflows() {
        let mut summaries = vec![BucketSummary { day_number: 1, word_count: 0 }];
        decrement_bucket(&mut summaries, Some(1));
        assert_eq!(summaries[0].word_count, 0);
    }
}
