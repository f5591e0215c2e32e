use serde::{
    Deserialize,
    Serialize,
};

pub const SHARED_SPACE: u32 = 0;
pub const PERSONAL_SPACES: u32 = 10;
pub const SHARED_BUCKETS: u32 = 30;
pub const PERSONAL_BUCKETS: u32 = 10;

/// Which learning space the user is working in: 0 is the shared TOEIC
/// curriculum, 1..=10 are the personal spaces. Passed explicitly into every
/// store call and view instead of living in ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySpace {
    owner: u32,
}

impl Default for StudySpace {
    fn default() -> Self {
        Self::shared()
    }
}

impl StudySpace {
    pub fn shared() -> Self {
        Self { owner: SHARED_SPACE }
    }

    pub fn personal(user_id: u32) -> Self {
        let owner = user_id.clamp(1, PERSONAL_SPACES);
        Self { owner }
    }

    pub fn owner(&self) -> u32 {
        self.owner
    }

    pub fn is_personal(&self) -> bool {
        self.owner > 0
    }

    /// Number of buckets this space exposes (days for the shared
    /// curriculum, wordbooks for personal spaces).
    pub fn bucket_count(&self) -> u32 {
        if self.is_personal() {
            PERSONAL_BUCKETS
        } else {
            SHARED_BUCKETS
        }
    }

    /// What a bucket is called in this space.
    pub fn bucket_noun(&self) -> &'static str {
        if self.is_personal() {
            "Wordbook"
        } else {
            "Day"
        }
    }

    pub fn bucket_label(&self, bucket: u32) -> String {
        format!("{} {}", self.bucket_noun(), bucket)
    }

    /// Preference key for this space's bucket display names.
    pub fn alias_key(&self) -> String {
        format!("wordbook_names_{}", self.owner)
    }

    /// Preference key for this space's memo list.
    pub fn memo_key(&self) -> String {
        format!("memos_{}", self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_space_has_thirty_day_buckets() {
        let space = StudySpace::shared();
        assert!(!space.is_personal());
        assert_eq!(space.bucket_count(), 30);
        assert_eq!(space.bucket_label(3), "Day 3");
    }

    #[test]
    fn personal_space_has_ten_wordbooks() {
        let space = StudySpace::personal(4);
        assert!(space.is_personal());
        assert_eq!(space.bucket_count(), 10);
        assert_eq!(space.bucket_label(2), "Wordbook 2");
        assert_eq!(space.alias_key(), "wordbook_names_4");
    }

    #[test]
    fn personal_ids_are_clamped_to_valid_range() {
        assert_eq!(StudySpace::personal(0).owner(), 1);
        assert_eq!(StudySpace::personal(25).owner(), 10);
    }
}
