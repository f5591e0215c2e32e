use std::time::{
    Duration,
    Instant,
};

use chrono::Utc;

use super::*;
use crate::core::WordEntry;

fn deck(words: &[&str]) -> Vec<WordEntry> {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| WordEntry {
            id: format!("w{}", i),
            word: w.to_string(),
            meaning: format!("meaning of {}", w),
            example: None,
            study_day: Some(1),
            created_at: Utc::now(),
        })
        .collect()
}

fn assert_position_invariant(seq: &Sequencer) {
    assert!(seq.position() <= seq.len(), "position {} > len {}", seq.position(), seq.len());
    if seq.position() == seq.len() && !seq.is_empty() {
        assert_eq!(seq.state(), SequencerState::Finished);
        assert!(!seq.repeat());
    }
}

/// Runs one full word cycle for a sequencer with speech: utterance end,
/// gap timer, meaning timer. Returns the commands from the final advance.
fn run_word_cycle(seq: &mut Sequencer, start: Instant) -> Vec<SequencerCommand> {
    let after_utterance = start + Duration::from_millis(400);
    assert!(seq.on_utterance_end(after_utterance).is_empty());
    assert_eq!(seq.state(), SequencerState::GapAfterWord);
    assert_position_invariant(seq);

    let gap_deadline = seq.next_deadline().expect("gap timer scheduled");
    assert!(seq.tick(gap_deadline).is_empty());
    assert_eq!(seq.state(), SequencerState::ShowingMeaning);
    assert_position_invariant(seq);

    let meaning_deadline = seq.next_deadline().expect("meaning timer scheduled");
    let commands = seq.tick(meaning_deadline);
    assert_position_invariant(seq);
    commands
}

#[test]
fn three_word_playthrough_reaches_finished() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench", "cedar"]), true);

    let commands = seq.toggle_play(start);
    assert_eq!(commands, vec![SequencerCommand::Speak("apple".to_string())]);
    assert_eq!(seq.state(), SequencerState::PlayingWord);
    assert_eq!(seq.position(), 0);

    let commands = run_word_cycle(&mut seq, start);
    assert_eq!(commands, vec![SequencerCommand::Speak("bench".to_string())]);
    assert_eq!(seq.position(), 1);

    let commands = run_word_cycle(&mut seq, start);
    assert_eq!(commands, vec![SequencerCommand::Speak("cedar".to_string())]);
    assert_eq!(seq.position(), 2);

    let commands = run_word_cycle(&mut seq, start);
    assert!(commands.is_empty());
    assert_eq!(seq.state(), SequencerState::Finished);
    assert!(!seq.playing());
    assert_eq!(seq.position(), 3);
    assert!(seq.next_deadline().is_none(), "finished state must schedule nothing");
}

#[test]
fn repeat_wraps_to_the_start_instead_of_finishing() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench"]), true);
    seq.set_repeat(true);

    seq.toggle_play(start);
    run_word_cycle(&mut seq, start);
    assert_eq!(seq.position(), 1);

    let commands = run_word_cycle(&mut seq, start);
    assert_eq!(commands, vec![SequencerCommand::Speak("apple".to_string())]);
    assert_eq!(seq.position(), 0);
    assert_eq!(seq.state(), SequencerState::PlayingWord);
    assert!(seq.playing());
}

#[test]
fn toggle_pauses_and_cancels_everything() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench"]), true);

    seq.toggle_play(start);
    seq.on_utterance_end(start);
    assert!(seq.next_deadline().is_some());

    let commands = seq.toggle_play(start + Duration::from_millis(100));
    assert_eq!(commands, vec![SequencerCommand::CancelSpeech]);
    assert!(!seq.playing());
    assert!(seq.next_deadline().is_none());
    assert_eq!(seq.state(), SequencerState::Idle);
}

#[test]
fn starting_from_the_end_resets_to_zero() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple"]), true);

    seq.toggle_play(start);
    run_word_cycle(&mut seq, start);
    assert_eq!(seq.state(), SequencerState::Finished);

    let commands = seq.toggle_play(start + Duration::from_secs(10));
    assert_eq!(commands, vec![SequencerCommand::Speak("apple".to_string())]);
    assert_eq!(seq.position(), 0);
}

#[test]
fn jump_while_paused_stays_idle_with_no_timer() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench", "cedar"]), true);

    let commands = seq.jump_to(2, start);
    assert_eq!(commands, vec![SequencerCommand::CancelSpeech]);
    assert!(!seq.playing());
    assert_eq!(seq.position(), 2);
    assert_eq!(seq.phase(), Phase::Word);
    assert!(seq.next_deadline().is_none());
    assert_eq!(seq.state(), SequencerState::Idle);
}

#[test]
fn jump_while_playing_restarts_the_word_phase() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench", "cedar"]), true);

    seq.toggle_play(start);
    seq.on_utterance_end(start);
    assert_eq!(seq.state(), SequencerState::GapAfterWord);

    let commands = seq.jump_to(2, start + Duration::from_millis(100));
    assert_eq!(
        commands,
        vec![
            SequencerCommand::CancelSpeech,
            SequencerCommand::Speak("cedar".to_string()),
        ]
    );
    assert_eq!(seq.state(), SequencerState::PlayingWord);
    assert_eq!(seq.position(), 2);
}

#[test]
fn jump_past_the_end_is_ignored() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple"]), true);
    assert!(seq.jump_to(5, start).is_empty());
    assert_eq!(seq.position(), 0);
}

#[test]
fn speed_change_does_not_retime_a_scheduled_timer() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench"]), false);

    seq.toggle_play(start);
    let deadline = seq.next_deadline().expect("silent word timer");
    assert_eq!(deadline, start + SILENT_WORD);

    seq.set_speed(4.0);
    assert_eq!(seq.next_deadline(), Some(deadline), "deadline fixed at schedule time");

    // Not due yet one millisecond early.
    assert!(seq.tick(deadline - Duration::from_millis(1)).is_empty());
    assert_eq!(seq.state(), SequencerState::PlayingWord);

    // The next timer picks up the new speed.
    seq.tick(deadline);
    assert_eq!(seq.state(), SequencerState::ShowingMeaning);
    let meaning_deadline = seq.next_deadline().unwrap();
    assert_eq!(meaning_deadline, deadline + MEANING_DISPLAY.div_f32(4.0));
}

#[test]
fn no_speech_mode_progresses_on_timers_alone() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench"]), false);

    let commands = seq.toggle_play(start);
    assert!(commands.is_empty(), "no speech backend, no speak command");
    assert_eq!(seq.state(), SequencerState::PlayingWord);

    seq.tick(start + SILENT_WORD);
    assert_eq!(seq.state(), SequencerState::ShowingMeaning);

    let deadline = seq.next_deadline().unwrap();
    seq.tick(deadline);
    assert_eq!(seq.position(), 1);
    assert_eq!(seq.state(), SequencerState::PlayingWord);
    assert!(seq.next_deadline().is_some());
}

#[test]
fn failed_utterance_advances_like_a_completed_one() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench"]), true);

    seq.toggle_play(start);
    seq.on_utterance_failed(start + Duration::from_millis(50));
    assert_eq!(seq.state(), SequencerState::GapAfterWord);
    assert!(seq.next_deadline().is_some());
}

#[test]
fn empty_list_is_inert() {
    let start = Instant::now();
    let mut seq = Sequencer::new(Vec::new(), true);

    assert!(seq.toggle_play(start).is_empty());
    assert!(seq.jump_to(0, start).is_empty());
    assert!(seq.tick(start + Duration::from_secs(5)).is_empty());
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(!seq.playing());
    assert!(seq.next_deadline().is_none());
}

#[test]
fn position_invariant_holds_across_a_full_session() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple", "bench", "cedar"]), true);
    assert_position_invariant(&seq);

    seq.toggle_play(start);
    assert_position_invariant(&seq);

    seq.jump_to(1, start);
    assert_position_invariant(&seq);

    run_word_cycle(&mut seq, start);
    assert_position_invariant(&seq);

    run_word_cycle(&mut seq, start);
    assert_position_invariant(&seq);
    assert_eq!(seq.state(), SequencerState::Finished);
}

#[test]
fn stale_utterance_end_while_paused_is_ignored() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple"]), true);

    seq.toggle_play(start);
    seq.toggle_play(start + Duration::from_millis(10));

    // The utterance end arrives after the pause already cancelled it.
    assert!(seq.on_utterance_end(start + Duration::from_millis(20)).is_empty());
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(seq.next_deadline().is_none());
}

#[test]
fn shutdown_cancels_and_stops() {
    let start = Instant::now();
    let mut seq = Sequencer::new(deck(&["apple"]), true);

    seq.toggle_play(start);
    let commands = seq.shutdown();
    assert_eq!(commands, vec![SequencerCommand::CancelSpeech]);
    assert!(!seq.playing());
    assert!(seq.next_deadline().is_none());
}
