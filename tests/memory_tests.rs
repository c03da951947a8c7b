//! Pattern Memory tests.
//!
//! With default timing the reveal of a four-step pattern takes
//! 4 × (600 + 400) + 300 = 4300ms before the buttons open.

use party_duel::core::{Phase, Player};
use party_duel::engine::{Engine, Input, Outcome, Verdict};
use party_duel::games::memory::{MemoryRules, MemorySettings, Status};
use party_duel::games::{MemoryGame, Payload};
use party_duel::timing::{Millis, Scheduler, Timeline};

fn advance(timeline: &mut Timeline, game: &mut MemoryGame, ms: Millis) {
    timeline.advance(ms, |tl, id| {
        game.fire(tl, id);
    });
}

fn started(settings: MemorySettings) -> (Timeline, MemoryGame) {
    let mut timeline = Timeline::new();
    let mut game = Engine::new(MemoryRules::new(settings)).unwrap();
    game.start(&mut timeline);
    (timeline, game)
}

fn opened(settings: MemorySettings) -> (Timeline, MemoryGame, Vec<u8>) {
    let (mut timeline, mut game) = started(settings);
    let reveal = game.rules().settings().reveal_ms();
    advance(&mut timeline, &mut game, reveal);
    assert_eq!(game.phase(), Phase::Active);
    let pattern = game.rules().pattern().to_vec();
    (timeline, game, pattern)
}

fn enter(timeline: &mut Timeline, game: &mut MemoryGame, player: Player, steps: &[u8]) -> Vec<Verdict> {
    steps
        .iter()
        .map(|&step| game.submit_input(timeline, player, Input::Press(step)))
        .collect()
}

fn wrong_step(pattern: &[u8], index: usize) -> u8 {
    (pattern[index] + 1) % 4
}

fn lit(game: &MemoryGame, now: Millis) -> Option<u8> {
    match game.snapshot(now).payload {
        Payload::Memory(view) => view.lit,
        _ => panic!("wrong payload"),
    }
}

/// Test the flash schedule and when input opens.
#[test]
fn test_reveal_schedule() {
    let (mut timeline, mut game) = started(MemorySettings::default());
    let pattern = game.rules().pattern().to_vec();
    assert_eq!(pattern.len(), 4);
    assert!(pattern.iter().all(|&b| b < 4));
    assert_eq!(lit(&game, timeline.now()), None);

    advance(&mut timeline, &mut game, 600);
    assert_eq!(lit(&game, timeline.now()), Some(pattern[0]));

    advance(&mut timeline, &mut game, 400);
    assert_eq!(lit(&game, timeline.now()), None);

    advance(&mut timeline, &mut game, 600);
    assert_eq!(lit(&game, timeline.now()), Some(pattern[1]));

    advance(&mut timeline, &mut game, 4299 - 1600);
    assert_eq!(game.phase(), Phase::Setup);
    advance(&mut timeline, &mut game, 1);
    assert_eq!(game.phase(), Phase::Active);
}

/// Test that presses during the reveal are ignored.
#[test]
fn test_press_during_reveal_ignored() {
    let (mut timeline, mut game) = started(MemorySettings::default());
    advance(&mut timeline, &mut game, 700);
    assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Press(0)), Verdict::Ignored);
    assert_eq!(game.rules().progress(Player::P1).entered().len(), 0);
}

/// Test that both players completing the pattern is a draw.
#[test]
fn test_both_pass_is_draw() {
    let (mut timeline, mut game, pattern) = opened(MemorySettings::default());

    let verdicts = enter(&mut timeline, &mut game, Player::P1, &pattern);
    assert!(verdicts.iter().all(|&v| v == Verdict::Correct));
    assert!(game.is_locked(Player::P1));
    assert_eq!(game.phase(), Phase::Active);

    enter(&mut timeline, &mut game, Player::P2, &pattern);
    assert_eq!(game.phase(), Phase::Resolved);
    assert_eq!(game.last_round().unwrap().outcome, Outcome::Draw);

    advance(&mut timeline, &mut game, 1200);
    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(game.last_match().unwrap().outcome, Outcome::Draw);
}

/// Test that a miss while the opponent is still entering loses at once.
#[test]
fn test_miss_loses_immediately() {
    let (mut timeline, mut game, pattern) = opened(MemorySettings::default());

    assert_eq!(game.submit_input(&mut timeline, Player::P2, Input::Press(pattern[0])), Verdict::Correct);
    let wrong = wrong_step(&pattern, 0);
    assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Press(wrong)), Verdict::Wrong);

    assert_eq!(game.phase(), Phase::Resolved);
    assert_eq!(game.rules().progress(Player::P1).status(), Status::Failed);
    assert_eq!(game.last_round().unwrap().outcome, Outcome::Win { winner: Player::P2 });
    assert_eq!(game.scores()[Player::P2], 1);
}

/// Test that passing then watching the opponent fail wins.
#[test]
fn test_pass_then_opponent_fails() {
    let (mut timeline, mut game, pattern) = opened(MemorySettings::default());

    enter(&mut timeline, &mut game, Player::P1, &pattern);
    assert_eq!(game.phase(), Phase::Active);

    let mut attempt = pattern[..2].to_vec();
    attempt.push(wrong_step(&pattern, 2));
    let verdicts = enter(&mut timeline, &mut game, Player::P2, &attempt);
    assert_eq!(verdicts, vec![Verdict::Correct, Verdict::Correct, Verdict::Wrong]);

    assert_eq!(game.last_round().unwrap().outcome, Outcome::Win { winner: Player::P1 });
    advance(&mut timeline, &mut game, 1200);
    assert_eq!(game.last_match().unwrap().outcome, Outcome::Win { winner: Player::P1 });
}

/// Test that a locked player's presses are ignored.
#[test]
fn test_locked_player_ignored() {
    let (mut timeline, mut game, pattern) = opened(MemorySettings::default());

    enter(&mut timeline, &mut game, Player::P1, &pattern);
    assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Press(0)), Verdict::Ignored);
    assert_eq!(game.rules().progress(Player::P1).entered().len(), 4);
}

/// Test that presses outside the button row are ignored.
#[test]
fn test_out_of_range_box_ignored() {
    let (mut timeline, mut game, _) = opened(MemorySettings::default());
    assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Press(4)), Verdict::Ignored);
    assert!(!game.is_locked(Player::P1));
}

/// Test that the solution is only exposed once the round is decided.
#[test]
fn test_solution_revealed_after_decision() {
    let (mut timeline, mut game, pattern) = opened(MemorySettings::default());

    let solution = |game: &MemoryGame, now| match game.snapshot(now).payload {
        Payload::Memory(view) => view.solution,
        _ => panic!("wrong payload"),
    };
    assert_eq!(solution(&game, timeline.now()), None);

    game.submit_input(&mut timeline, Player::P1, Input::Press(wrong_step(&pattern, 0)));
    assert_eq!(solution(&game, timeline.now()), Some(pattern));
}

/// Test that nobody finishing inside the window is no contest.
#[test]
fn test_window_lapses_no_contest() {
    let (mut timeline, mut game, _) = opened(MemorySettings::default().with_input_window(5000));

    advance(&mut timeline, &mut game, 4999);
    assert_eq!(game.phase(), Phase::Active);
    advance(&mut timeline, &mut game, 1);

    assert_eq!(game.phase(), Phase::Resolved);
    let round = game.last_round().unwrap();
    assert_eq!(round.outcome, Outcome::NoContest);
    assert_eq!(round.outcome.winner(), None);
    assert_eq!(game.scores()[Player::P1], 0);
    assert_eq!(game.scores()[Player::P2], 0);
}

/// Test that a finished player beats an unfinished one when the window lapses.
#[test]
fn test_window_lapses_with_one_finished() {
    let (mut timeline, mut game, pattern) = opened(MemorySettings::default().with_input_window(5000));

    enter(&mut timeline, &mut game, Player::P2, &pattern);
    enter(&mut timeline, &mut game, Player::P1, &pattern[..1]);
    advance(&mut timeline, &mut game, 5000);

    assert_eq!(game.last_round().unwrap().outcome, Outcome::Win { winner: Player::P2 });
}

/// Test that an opponent who never presses loses when the default window closes.
#[test]
fn test_idle_opponent_loses_on_default_window() {
    let (mut timeline, mut game, pattern) = opened(MemorySettings::default());

    enter(&mut timeline, &mut game, Player::P1, &pattern);
    advance(&mut timeline, &mut game, 9999);
    assert_eq!(game.phase(), Phase::Active);
    advance(&mut timeline, &mut game, 1);

    assert_eq!(game.phase(), Phase::Resolved);
    assert_eq!(game.rules().progress(Player::P2).status(), Status::Failed);
    assert_eq!(game.last_round().unwrap().outcome, Outcome::Win { winner: Player::P1 });
    advance(&mut timeline, &mut game, 1200);
    assert_eq!(game.phase(), Phase::Ended);
}

/// Test that without a window the buttons stay open until both are done.
#[test]
fn test_no_window_waits_for_both() {
    let (mut timeline, mut game, pattern) = opened(MemorySettings::default().without_input_window());

    enter(&mut timeline, &mut game, Player::P1, &pattern);
    advance(&mut timeline, &mut game, 60_000);
    assert_eq!(game.phase(), Phase::Active);
    assert_eq!(timeline.pending(), 0);

    enter(&mut timeline, &mut game, Player::P2, &pattern);
    assert_eq!(game.last_round().unwrap().outcome, Outcome::Draw);
}

/// Test a longer pattern on more boxes.
#[test]
fn test_custom_pattern_shape() {
    let settings = MemorySettings::default().with_pattern(6, 9).with_show_timing(100, 100, 0);
    assert_eq!(settings.reveal_ms(), 1200);

    let (mut timeline, mut game, pattern) = opened(settings);
    assert_eq!(pattern.len(), 6);
    assert!(pattern.iter().all(|&b| b < 9));

    enter(&mut timeline, &mut game, Player::P1, &pattern);
    enter(&mut timeline, &mut game, Player::P2, &pattern);
    assert_eq!(game.last_round().unwrap().outcome, Outcome::Draw);
}
