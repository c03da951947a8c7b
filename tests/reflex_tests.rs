//! Reflex Battle tests.
//!
//! All time is virtual: the timeline only moves when a test advances it,
//! and every due timer is handed straight back to the game.

use std::cell::RefCell;
use std::rc::Rc;

use party_duel::core::{MatchConfig, Phase, Player};
use party_duel::engine::{Engine, Input, Outcome, Report, Verdict};
use party_duel::games::reflex::{ReflexRules, ReflexSettings};
use party_duel::games::ReflexGame;
use party_duel::timing::{Millis, Scheduler, Timeline};

fn advance(timeline: &mut Timeline, game: &mut ReflexGame, ms: Millis) {
    timeline.advance(ms, |tl, id| {
        game.fire(tl, id);
    });
}

fn new_game(settings: ReflexSettings) -> ReflexGame {
    Engine::new(ReflexRules::new(settings)).unwrap()
}

/// Test that the go-signal arrives exactly after the drawn delay.
#[test]
fn test_go_signal_after_random_delay() {
    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default());

    game.start(&mut timeline);
    assert_eq!(game.phase(), Phase::Setup);
    assert_eq!(game.round(), 1);

    let delay = game.rules().delay_ms();
    assert!((2000..=6000).contains(&delay));

    advance(&mut timeline, &mut game, delay - 1);
    assert_eq!(game.phase(), Phase::Setup);

    advance(&mut timeline, &mut game, 1);
    assert_eq!(game.phase(), Phase::Active);
}

/// Test that the first tap after the go-signal wins and records reaction time.
#[test]
fn test_first_tap_wins() {
    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default());
    game.start(&mut timeline);

    let delay = game.rules().delay_ms();
    advance(&mut timeline, &mut game, delay + 250);

    assert_eq!(game.submit_input(&mut timeline, Player::P2, Input::Tap), Verdict::Correct);
    assert_eq!(game.phase(), Phase::Resolved);
    assert_eq!(game.scores()[Player::P2], 1);
    assert_eq!(game.scores()[Player::P1], 0);

    let round = game.last_round().unwrap();
    assert_eq!(round.outcome, Outcome::Win { winner: Player::P2 });
    assert_eq!(round.reaction_ms, Some(250));

    // The slower player is too late.
    assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Tap), Verdict::Ignored);
    assert_eq!(game.scores()[Player::P1], 0);
}

/// Test that tapping before the go-signal hands the round to the opponent.
#[test]
fn test_early_tap_is_foul() {
    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default());
    game.start(&mut timeline);

    advance(&mut timeline, &mut game, 1000);
    assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Tap), Verdict::Foul);
    assert_eq!(game.phase(), Phase::Resolved);
    assert_eq!(game.scores()[Player::P2], 1);

    let round = game.last_round().unwrap();
    assert_eq!(round.outcome, Outcome::Foul { offender: Player::P1 });
    assert_eq!(round.outcome.winner(), Some(Player::P2));
    assert_eq!(round.reaction_ms, None);

    // The go timer was cancelled; only the resolve display is pending.
    assert_eq!(game.pending_timers(), 1);
    assert_eq!(timeline.pending(), 1);
}

/// Test that a foul cancels the go-signal for good.
#[test]
fn test_foul_cancels_go_signal() {
    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default().with_flow(MatchConfig::default().with_resolve_display(10_000)));
    game.start(&mut timeline);

    game.submit_input(&mut timeline, Player::P2, Input::Tap);
    advance(&mut timeline, &mut game, 6000);
    assert_eq!(game.phase(), Phase::Resolved);
}

/// Test that the round is reported at resolution and the match after the display.
#[test]
fn test_reports_round_then_match() {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reports);

    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default()).with_reporter(move |report: &Report| {
        sink.borrow_mut().push(report.clone());
    });
    game.start(&mut timeline);

    let delay = game.rules().delay_ms();
    advance(&mut timeline, &mut game, delay + 180);
    game.submit_input(&mut timeline, Player::P1, Input::Tap);
    assert_eq!(reports.borrow().len(), 1);
    assert!(matches!(reports.borrow()[0], Report::Round(_)));

    advance(&mut timeline, &mut game, 1999);
    assert_eq!(game.phase(), Phase::Resolved);
    advance(&mut timeline, &mut game, 1);
    assert_eq!(game.phase(), Phase::Ended);

    let reports = reports.borrow();
    assert_eq!(reports.len(), 2);
    match &reports[1] {
        Report::Match(result) => {
            assert_eq!(result.outcome, Outcome::Win { winner: Player::P1 });
            assert_eq!(result.rounds, 1);
        }
        other => panic!("expected match report, got {other:?}"),
    }
}

/// Test first-to-N matches keep scores across rounds.
#[test]
fn test_multi_round_match() {
    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default().with_target_wins(2));
    game.start(&mut timeline);

    for round in 1..=2 {
        assert_eq!(game.round(), round);
        let delay = game.rules().delay_ms();
        advance(&mut timeline, &mut game, delay);
        assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Tap), Verdict::Correct);
        advance(&mut timeline, &mut game, 2000);
    }

    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(game.scores()[Player::P1], 2);
    assert_eq!(game.last_match().unwrap().rounds, 2);
}

/// Test that without auto-advance the engine waits in Idle for start().
#[test]
fn test_manual_advance_keeps_scores() {
    let mut timeline = Timeline::new();
    let flow = MatchConfig::default().with_auto_advance(false);
    let mut game = new_game(ReflexSettings::default().with_target_wins(3).with_flow(flow));
    game.start(&mut timeline);

    game.submit_input(&mut timeline, Player::P1, Input::Tap);
    advance(&mut timeline, &mut game, 2000);
    assert_eq!(game.phase(), Phase::Idle);
    assert_eq!(game.scores()[Player::P2], 1);

    game.start(&mut timeline);
    assert_eq!(game.phase(), Phase::Setup);
    assert_eq!(game.round(), 2);
    assert_eq!(game.scores()[Player::P2], 1);
}

/// Test that start() from Ended begins a fresh match.
#[test]
fn test_rematch_resets_scores() {
    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default());
    game.start(&mut timeline);

    game.submit_input(&mut timeline, Player::P2, Input::Tap);
    advance(&mut timeline, &mut game, 2000);
    assert_eq!(game.phase(), Phase::Ended);

    game.start(&mut timeline);
    assert_eq!(game.phase(), Phase::Setup);
    assert_eq!(game.round(), 1);
    assert_eq!(game.scores()[Player::P1], 0);
    assert_eq!(game.scores()[Player::P2], 0);
    assert!(game.last_match().is_none());
}

/// Test that start() in the middle of a round is ignored.
#[test]
fn test_start_ignored_mid_round() {
    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default());
    game.start(&mut timeline);
    let delay = game.rules().delay_ms();

    game.start(&mut timeline);
    assert_eq!(game.round(), 1);
    assert_eq!(game.rules().delay_ms(), delay);
    assert_eq!(timeline.pending(), 1);
}

/// Test that non-tap inputs mean nothing in this game.
#[test]
fn test_unrecognized_input_ignored() {
    let mut timeline = Timeline::new();
    let mut game = new_game(ReflexSettings::default());
    game.start(&mut timeline);

    assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Press(0)), Verdict::Ignored);
    assert_eq!(game.phase(), Phase::Setup);
}

/// Test that a fixed delay range gives a fixed go time.
#[test]
fn test_fixed_delay() {
    let mut timeline = Timeline::starting_at(10_000);
    let mut game = new_game(ReflexSettings::default().with_delay(3000, 3000));
    game.start(&mut timeline);

    advance(&mut timeline, &mut game, 3000);
    assert_eq!(game.phase(), Phase::Active);
    assert_eq!(timeline.now(), 13_000);
}
