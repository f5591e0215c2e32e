use crate::core::{
    BucketSummary,
    OwnerSpaceSummary,
    WordEntry,
};

/// Which view asked for a word list. Results arriving after the user
/// navigated elsewhere are dropped instead of applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckDest {
    WordList,
    Study,
    Listen,
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    DeckLoaded { dest: DeckDest, result: Result<Vec<WordEntry>, String> },
    WordLoaded(Result<WordEntry, String>),
    WordSaved(Result<WordEntry, String>),
    WordDeleted { id: String, result: Result<(), String> },
    BucketsLoaded(Result<Vec<BucketSummary>, String>),
    SummariesLoaded(Result<Vec<OwnerSpaceSummary>, String>),
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::DeckLoaded { .. } => "deck_loaded",
            TaskResult::WordLoaded(_) => "word_loaded",
            TaskResult::WordSaved(_) => "word_saved",
            TaskResult::WordDeleted { .. } => "word_deleted",
            TaskResult::BucketsLoaded(_) => "buckets_loaded",
            TaskResult::SummariesLoaded(_) => "summaries_loaded",
        }
    }
}
