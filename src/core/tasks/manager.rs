use std::{
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use tokio::runtime::Runtime;

use super::{
    DeckDest,
    TaskResult,
};
use crate::{
    api::WordStore,
    core::{
        StudySpace,
        WordDraft,
        WordPatch,
    },
};

/// Runs store calls off the GUI thread and funnels results back through a
/// channel polled once per frame. Errors cross the channel as strings so
/// results stay `Clone`.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));
        let (sender, receiver) = mpsc::channel();
        Self { runtime, receiver, sender }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }
        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    /// `GET /words` with optional search/bucket filters.
    pub fn fetch_words(
        &self,
        store: WordStore,
        space: StudySpace,
        search: Option<String>,
        day: Option<u32>,
        dest: DeckDest,
    ) {
        let (sender, runtime) = self.task_context();
        thread::spawn(move || {
            let result = runtime.block_on(async {
                store.list(space, search.as_deref(), day).await.map_err(|e| e.to_string())
            });
            let _ = sender.send(TaskResult::DeckLoaded { dest, result });
        });
    }

    /// `GET /days/:day/words`, the cache-busted per-bucket fetch.
    pub fn fetch_bucket_words(
        &self,
        store: WordStore,
        space: StudySpace,
        day: u32,
        dest: DeckDest,
    ) {
        let (sender, runtime) = self.task_context();
        thread::spawn(move || {
            let result = runtime.block_on(async {
                store.bucket_words(space, day).await.map_err(|e| e.to_string())
            });
            let _ = sender.send(TaskResult::DeckLoaded { dest, result });
        });
    }

    pub fn fetch_word(&self, store: WordStore, id: String) {
        let (sender, runtime) = self.task_context();
        thread::spawn(move || {
            let result =
                runtime.block_on(async { store.word(&id).await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::WordLoaded(result));
        });
    }

    pub fn create_word(&self, store: WordStore, space: StudySpace, draft: WordDraft) {
        let (sender, runtime) = self.task_context();
        thread::spawn(move || {
            let result = runtime
                .block_on(async { store.create(space, draft).await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::WordSaved(result));
        });
    }

    pub fn update_word(&self, store: WordStore, id: String, patch: WordPatch) {
        let (sender, runtime) = self.task_context();
        thread::spawn(move || {
            let result = runtime
                .block_on(async { store.update(&id, patch).await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::WordSaved(result));
        });
    }

    pub fn delete_word(&self, store: WordStore, id: String) {
        let (sender, runtime) = self.task_context();
        thread::spawn(move || {
            let result =
                runtime.block_on(async { store.delete(&id).await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::WordDeleted { id, result });
        });
    }

    pub fn fetch_buckets(&self, store: WordStore, space: StudySpace) {
        let (sender, runtime) = self.task_context();
        thread::spawn(move || {
            let result =
                runtime.block_on(async { store.buckets(space).await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::BucketsLoaded(result));
        });
    }

    pub fn fetch_personal_summary(&self, store: WordStore) {
        let (sender, runtime) = self.task_context();
        thread::spawn(move || {
            let result = runtime
                .block_on(async { store.personal_summary().await.map_err(|e| e.to_string()) });
            let _ = sender.send(TaskResult::SummariesLoaded(result));
        });
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}
