// Native tests for the pure session state machine. These avoid wasm/browser
// APIs and exercise the logic the DOM controller drives, so they run under
// `cargo test` on the host.

use study_rpg::session::{
    Advance, SessionState, format_elapsed, progress_label, xp_progress_percent,
};

// Three questions answered [correct, incorrect, correct] earning [10, 0, 15]:
// the index walks 0 -> 1 -> 2 -> results and the total lands at 25.
#[test]
fn three_question_scenario_accumulates_xp_and_ends_in_results() {
    let mut state = SessionState::new(3);
    let script = [(true, 10), (false, 0), (true, 15)];

    for (i, (is_correct, xp)) in script.into_iter().enumerate() {
        assert_eq!(state.current_index(), i, "unexpected index before question {i}");
        state.record_reply(is_correct, xp);
        match state.advance_target() {
            Advance::Next(next) => {
                assert_eq!(next, i + 1, "advance from {i} must target {}", i + 1);
                assert!(state.enter_question(next), "index {next} should be in range");
            }
            Advance::Results => {
                assert_eq!(i, 2, "results must only be reached after the last question");
            }
        }
    }

    assert_eq!(state.total_xp(), 25);
    assert_eq!(state.advance_target(), Advance::Results);
}

#[test]
fn advance_is_strictly_monotonic() {
    let mut state = SessionState::new(5);
    for i in 0..4 {
        assert_eq!(state.advance_target(), Advance::Next(i + 1));
        assert!(state.enter_question(i + 1));
    }
    assert_eq!(state.advance_target(), Advance::Results);
}

#[test]
fn out_of_range_entry_is_rejected() {
    let mut state = SessionState::new(2);
    assert!(state.enter_question(1));
    assert!(!state.enter_question(2), "index == count must be rejected");
    assert!(!state.enter_question(100));
    // The rejected entry leaves the pointer where it was.
    assert_eq!(state.current_index(), 1);
}

#[test]
fn empty_session_goes_straight_to_results() {
    let mut state = SessionState::new(0);
    assert!(!state.has_questions());
    assert!(!state.enter_question(0));
    assert_eq!(state.advance_target(), Advance::Results);
}

#[test]
fn streak_counts_consecutive_correct_answers_only() {
    let mut state = SessionState::new(10);
    state.record_reply(true, 5);
    state.record_reply(true, 5);
    assert_eq!(state.streak(), 2);
    state.record_reply(false, 0);
    assert_eq!(state.streak(), 0, "an incorrect answer resets the streak");
    state.record_reply(true, 5);
    assert_eq!(state.streak(), 1);
    assert_eq!(state.total_xp(), 15, "xp is never clawed back");
}

#[test]
fn elapsed_time_formats_as_zero_padded_minutes_and_seconds() {
    assert_eq!(format_elapsed(0), "00:00");
    assert_eq!(format_elapsed(5), "00:05");
    assert_eq!(format_elapsed(59), "00:59");
    assert_eq!(format_elapsed(60), "01:00");
    assert_eq!(format_elapsed(65), "01:05");
    assert_eq!(format_elapsed(600), "10:00");
    // Long sessions keep counting minutes rather than rolling into hours.
    assert_eq!(format_elapsed(3725), "62:05");
}

#[test]
fn progress_label_is_one_based() {
    assert_eq!(progress_label(0, 5), "Question 1 of 5");
    assert_eq!(progress_label(4, 5), "Question 5 of 5");
}

#[test]
fn xp_progress_wraps_every_level() {
    assert_eq!(xp_progress_percent(0), 0);
    assert_eq!(xp_progress_percent(45), 45);
    assert_eq!(xp_progress_percent(100), 0);
    assert_eq!(xp_progress_percent(250), 50);
}
