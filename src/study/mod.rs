//! Self-paced study sessions: no timers, the user drives every step.

use crate::core::WordEntry;

pub struct StudySession {
    items: Vec<WordEntry>,
    position: usize,
    revealed: bool,
    complete: bool,
}

impl StudySession {
    pub fn new(items: Vec<WordEntry>) -> Self {
        Self { items, position: 0, revealed: false, complete: false }
    }

    pub fn items(&self) -> &[WordEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&WordEntry> {
        self.items.get(self.position)
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn complete(&self) -> bool {
        self.complete
    }

    pub fn toggle_reveal(&mut self) {
        if !self.complete {
            self.revealed = !self.revealed;
        }
    }

    /// Advances, or marks the session complete from the last card.
    pub fn next(&mut self) {
        if self.complete || self.is_empty() {
            return;
        }
        if self.position + 1 >= self.items.len() {
            self.complete = true;
        } else {
            self.position += 1;
            self.revealed = false;
        }
    }

    /// No-op on the first card.
    pub fn prev(&mut self) {
        if self.position > 0 && !self.complete {
            self.position -= 1;
            self.revealed = false;
        }
    }

    pub fn restart(&mut self) {
        self.position = 0;
        self.revealed = false;
        self.complete = false;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn deck(n: usize) -> Vec<WordEntry> {
        (0..n)
            .map(|i| WordEntry {
                id: format!("w{}", i),
                word: format!("word{}", i),
                meaning: format!("meaning{}", i),
                example: None,
                study_day: Some(1),
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn next_from_last_card_completes() {
        let mut session = StudySession::new(deck(2));
        session.next();
        assert_eq!(session.position(), 1);
        assert!(!session.complete());

        session.next();
        assert!(session.complete());
        assert_eq!(session.position(), 1, "position stays on the last card");

        session.next();
        assert!(session.complete(), "further next calls are no-ops");
    }

    #[test]
    fn prev_is_a_noop_at_the_start() {
        let mut session = StudySession::new(deck(3));
        session.prev();
        assert_eq!(session.position(), 0);

        session.next();
        session.prev();
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn advancing_hides_the_meaning_again() {
        let mut session = StudySession::new(deck(3));
        session.toggle_reveal();
        assert!(session.revealed());

        session.next();
        assert!(!session.revealed());

        session.toggle_reveal();
        session.prev();
        assert!(!session.revealed());
    }

    #[test]
    fn restart_clears_everything() {
        let mut session = StudySession::new(deck(2));
        session.toggle_reveal();
        session.next();
        session.next();
        assert!(session.complete());

        session.restart();
        assert_eq!(session.position(), 0);
        assert!(!session.revealed());
        assert!(!session.complete());
    }

    #[test]
    fn empty_session_never_completes() {
        let mut session = StudySession::new(Vec::new());
        session.next();
        assert!(!session.complete());
        assert!(session.current().is_none());
    }
}
