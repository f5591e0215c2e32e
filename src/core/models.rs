use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A single vocabulary entry as served by the words API. The client never
/// mutates these in place; edits go through `WordPatch` and a re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: String,
    pub word: String,
    pub meaning: String,
    pub example: Option<String>,
    pub study_day: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /words`. `user_id` is filled in from the active space.
#[derive(Debug, Clone, Serialize)]
pub struct WordDraft {
    pub word: String,
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u32>,
}

/// Partial body for `PUT /words/:id`; `None` fields are left untouched
/// server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_day: Option<u32>,
}

/// One bucket row from `GET /days`: derived server-side, never persisted
/// by the client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BucketSummary {
    pub day_number: u32,
    pub word_count: usize,
}

/// One row from `GET /personal/summary`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OwnerSpaceSummary {
    pub user_id: u32,
    pub word_count: usize,
}
