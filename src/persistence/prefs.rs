//! Typed preference collections layered over the key-value store:
//! bucket display aliases, per-space memo pads, and the global
//! personal-space name map. All of it is cosmetic local state; nothing
//! here affects queries against the words API.

use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::TangochoError;

pub const MAX_ALIAS_CHARS: usize = 20;
pub const MAX_MEMOS: usize = 5;
pub const MAX_MEMO_TITLE_CHARS: usize = 30;

fn clamp_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// User-chosen display names for a space's buckets, keyed by bucket number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketAliases {
    names: HashMap<String, String>,
}

impl BucketAliases {
    pub fn label_for(&self, bucket: u32) -> Option<&str> {
        self.names.get(&bucket.to_string()).map(String::as_str).filter(|s| !s.is_empty())
    }

    /// Sets a display name, clamped to the alias length limit. An empty
    /// name clears the alias.
    pub fn set_label(&mut self, bucket: u32, label: &str) {
        let label = clamp_chars(label.trim(), MAX_ALIAS_CHARS);
        if label.is_empty() {
            self.names.remove(&bucket.to_string());
        } else {
            self.names.insert(bucket.to_string(), label);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memo {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// A space's freeform memos, capped at `MAX_MEMOS`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoPad {
    memos: Vec<Memo>,
}

impl MemoPad {
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.memos.len() >= MAX_MEMOS
    }

    pub fn get(&self, id: &str) -> Option<&Memo> {
        self.memos.iter().find(|m| m.id == id)
    }

    /// Creates a memo, rejecting the request once the cap is reached.
    pub fn create(&mut self, title: &str) -> Result<&Memo, TangochoError> {
        if self.is_full() {
            return Err(TangochoError::Validation(format!(
                "A space can hold at most {} memos.",
                MAX_MEMOS
            )));
        }
        let title = clamp_chars(title.trim(), MAX_MEMO_TITLE_CHARS);
        let title = if title.is_empty() { format!("Memo {}", self.memos.len() + 1) } else { title };
        self.memos.push(Memo {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            content: String::new(),
        });
        Ok(self.memos.last().expect("memo was just pushed"))
    }

    /// Retitles a memo; empty titles are ignored.
    pub fn rename(&mut self, id: &str, title: &str) {
        let title = clamp_chars(title.trim(), MAX_MEMO_TITLE_CHARS);
        if title.is_empty() {
            return;
        }
        if let Some(memo) = self.memos.iter_mut().find(|m| m.id == id) {
            memo.title = title;
        }
    }

    pub fn set_content(&mut self, id: &str, content: &str) {
        if let Some(memo) = self.memos.iter_mut().find(|m| m.id == id) {
            memo.content = content.to_string();
        }
    }

    pub fn delete(&mut self, id: &str) {
        self.memos.retain(|m| m.id != id);
    }
}

/// Global map of personal space id -> user-chosen display name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceNames {
    names: HashMap<String, String>,
}

pub const SPACE_NAMES_KEY: &str = "space_names";

impl SpaceNames {
    pub fn name_for(&self, user_id: u32) -> Option<&str> {
        self.names.get(&user_id.to_string()).map(String::as_str).filter(|s| !s.is_empty())
    }

    pub fn set_name(&mut self, user_id: u32, name: &str) {
        let name = clamp_chars(name.trim(), MAX_ALIAS_CHARS);
        if name.is_empty() {
            self.names.remove(&user_id.to_string());
        } else {
            self.names.insert(user_id.to_string(), name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_labels_are_clamped_to_twenty_chars() {
        let mut aliases = BucketAliases::default();
        aliases.set_label(2, "a very long wordbook name that keeps going");
        let label = aliases.label_for(2).unwrap();
        assert_eq!(label.chars().count(), MAX_ALIAS_CHARS);
    }

    #[test]
    fn empty_alias_clears_the_entry() {
        let mut aliases = BucketAliases::default();
        aliases.set_label(1, "Idioms");
        aliases.set_label(1, "   ");
        assert!(aliases.label_for(1).is_none());
    }

    #[test]
    fn sixth_memo_is_rejected_and_count_stays_at_five() {
        let mut pad = MemoPad::default();
        for i in 0..MAX_MEMOS {
            pad.create(&format!("memo {}", i)).unwrap();
        }
        assert!(pad.is_full());
        assert!(pad.create("one too many").is_err());
        assert_eq!(pad.len(), MAX_MEMOS);
    }

    #[test]
    fn memo_titles_are_clamped_to_thirty_chars() {
        let mut pad = MemoPad::default();
        let id = pad.create("t").unwrap().id.clone();
        pad.rename(&id, &"x".repeat(80));
        assert_eq!(pad.get(&id).unwrap().title.chars().count(), MAX_MEMO_TITLE_CHARS);
    }

    #[test]
    fn memo_content_edits_land_on_the_right_memo() {
        let mut pad = MemoPad::default();
        let first = pad.create("first").unwrap().id.clone();
        let second = pad.create("second").unwrap().id.clone();

        pad.set_content(&second, "notes");
        assert_eq!(pad.get(&first).unwrap().content, "");
        assert_eq!(pad.get(&second).unwrap().content, "notes");
    }

    #[test]
    fn deleting_a_memo_removes_exactly_that_memo() {
        let mut pad = MemoPad::default();
        let first = pad.create("first").unwrap().id.clone();
        let second = pad.create("second").unwrap().id.clone();

        pad.delete(&first);
        assert!(pad.get(&first).is_none());
        assert!(pad.get(&second).is_some());
        assert_eq!(pad.len(), 1);
    }

    #[test]
    fn blank_memo_title_gets_a_placeholder() {
        let mut pad = MemoPad::default();
        let memo = pad.create("  ").unwrap();
        assert_eq!(memo.title, "Memo 1");
    }
}
