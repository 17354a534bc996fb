//! Integration tests for the game loop through the facade crate

use std::time::Duration;

use tui_blockfall::core::{GameSnapshot, GameState};
use tui_blockfall::types::{GameAction, GameOverKind, Gate, Phase, LOCK_DELAY};

fn started(seed: u32) -> GameState {
    let mut game = GameState::new(seed);
    game.start();
    game
}

fn tick_ms(game: &mut GameState, total_ms: u64, step_ms: u64) {
    let mut left = total_ms;
    while left > 0 {
        let step = step_ms.min(left);
        game.tick(Duration::from_millis(step));
        left -= step;
    }
}

fn active_y(game: &GameState) -> i8 {
    game.active().map(|b| b.y()).unwrap()
}

#[test]
fn test_game_lifecycle() {
    let mut game = GameState::new(12345);
    assert!(!game.started());
    assert!(game.active().is_none());
    assert!(!game.apply_action(GameAction::MoveLeft));

    game.start();
    assert!(game.started());
    assert!(game.active().is_some());
    assert_eq!(game.phase(), Phase::Falling);
    assert_eq!(game.piece_id(), 1);
    assert_eq!((game.score(), game.level(), game.lines()), (0, 1, 0));
    assert_eq!(game.next_queue().len(), 5);
}

#[test]
fn test_gravity_at_level_one() {
    let mut game = started(1);
    assert_eq!(game.fall_interval(), Duration::from_millis(800));

    let y = active_y(&game);
    tick_ms(&mut game, 700, 100);
    assert_eq!(active_y(&game), y);
    tick_ms(&mut game, 100, 100);
    assert_eq!(active_y(&game), y + 1);
}

#[test]
fn test_large_tick_is_truncated() {
    let mut game = started(1);
    let y = active_y(&game);
    game.tick(Duration::from_secs(5));
    assert_eq!(active_y(&game), y);
    assert_eq!(game.fall_timer(), Duration::from_millis(100));
}

#[test]
fn test_soft_drop_moves_at_once_and_speeds_gravity() {
    let mut game = started(2);
    let y = active_y(&game);

    assert!(game.apply_action(GameAction::SoftDropStart));
    assert_eq!(active_y(&game), y + 1);
    assert_eq!(game.effective_interval(), Duration::from_millis(40));

    tick_ms(&mut game, 120, 20);
    assert_eq!(active_y(&game), y + 4);

    assert!(game.apply_action(GameAction::SoftDropStop));
    assert_eq!(game.effective_interval(), Duration::from_millis(800));
    assert!(!game.apply_action(GameAction::SoftDropStop));
}

#[test]
fn test_piece_locks_after_landing() {
    let mut game = started(3);
    game.apply_action(GameAction::SoftDropStart);

    let mut guard = 0;
    while game.piece_id() == 1 {
        game.tick(Duration::from_millis(20));
        guard += 1;
        assert!(guard < 1000, "piece never locked");
    }

    let event = game.take_last_event().unwrap();
    assert_eq!(event.piece_id, 1);
    assert!(!event.hard_drop);
    assert_eq!(game.board().filled_count(), 4);
    assert!(game.take_last_event().is_none());
}

#[test]
fn test_lock_waits_for_delay_while_landed() {
    let mut game = started(4);
    game.apply_action(GameAction::SoftDropStart);
    while game.phase() != Phase::Locking {
        game.tick(Duration::from_millis(40));
    }
    // Landed: 40ms steps accumulate into the lock timer.
    assert!(game.lock_timer() < LOCK_DELAY);
    assert_eq!(game.piece_id(), 1);
    tick_ms(&mut game, 500, 40);
    assert_eq!(game.piece_id(), 2);
}

#[test]
fn test_hard_drop_locks_immediately() {
    let mut game = started(5);
    assert!(game.apply_action(GameAction::HardDrop));
    assert_eq!(game.piece_id(), 2);
    assert_eq!(game.board().filled_count(), 4);

    let event = game.take_last_event().unwrap();
    assert!(event.hard_drop);
    assert_eq!(event.lines_cleared, 0);
    assert_eq!(event.points, 0);
    assert_eq!(event.game_over, None);
}

#[test]
fn test_hold_once_per_spawn() {
    let mut game = started(6);
    let first = game.active().unwrap().kind();
    let upcoming = game.next_queue()[0];

    assert!(game.apply_action(GameAction::Hold));
    assert_eq!(game.held(), Some(first));
    assert_eq!(game.active().unwrap().kind(), upcoming);
    assert!(!game.can_hold());
    assert!(!game.apply_action(GameAction::Hold));

    game.apply_action(GameAction::HardDrop);
    assert!(game.can_hold());
    let before = game.active().unwrap().kind();
    assert!(game.apply_action(GameAction::Hold));
    assert_eq!(game.active().unwrap().kind(), first);
    assert_eq!(game.held(), Some(before));
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        GameAction::MoveLeft,
        GameAction::RotateCw,
        GameAction::HardDrop,
        GameAction::Hold,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::HardDrop,
        GameAction::RotateCcw,
        GameAction::SoftDropStart,
    ];

    let mut a = started(777);
    let mut b = started(777);
    for action in script {
        a.apply_action(action);
        b.apply_action(action);
        a.tick(Duration::from_millis(33));
        b.tick(Duration::from_millis(33));
    }

    let (sa, sb): (GameSnapshot, GameSnapshot) = (a.snapshot(), b.snapshot());
    assert_eq!(sa, sb);
}

#[test]
fn test_gates_freeze_and_release() {
    let mut game = started(8);
    game.set_gate(Gate::Paused, true);
    assert!(game.is_gated());
    assert!(!game.tick(Duration::from_millis(100)));
    assert_eq!(game.fall_timer(), Duration::ZERO);
    assert!(!game.apply_action(GameAction::HardDrop));

    game.set_gate(Gate::Countdown, true);
    game.set_gate(Gate::Paused, false);
    assert!(game.is_gated());
    game.set_gate(Gate::Countdown, false);
    assert!(!game.is_gated());
    game.tick(Duration::from_millis(50));
    assert_eq!(game.fall_timer(), Duration::from_millis(50));
}

#[test]
fn test_stacking_ends_game_and_restart_recovers() {
    let mut game = started(9);
    for _ in 0..200 {
        if game.is_game_over() {
            break;
        }
        game.apply_action(GameAction::HardDrop);
    }
    assert!(game.is_game_over());
    assert_eq!(game.phase(), Phase::GameOver);
    assert!(game.active().is_none());
    assert!(matches!(
        game.game_over(),
        Some(GameOverKind::BlockOut) | Some(GameOverKind::LockOut)
    ));

    assert!(!game.apply_action(GameAction::MoveLeft));
    assert!(!game.tick(Duration::from_millis(100)));

    assert!(game.apply_action(GameAction::Restart));
    assert!(!game.is_game_over());
    assert_eq!(game.episode_id(), 1);
    assert_eq!(game.board().filled_count(), 0);
    assert_eq!(game.score(), 0);
    assert_eq!(game.held(), None);
    assert!(game.active().is_some());
}
