//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the gameplay simulation. It has no dependencies on
//! terminal output, input devices or files, which keeps it:
//!
//! - **Deterministic**: the same seed produces the same piece sequence
//! - **Testable**: every rule is reachable from unit tests
//! - **Portable**: two-player mode simply runs two instances
//!
//! # Module Structure
//!
//! - [`board`]: 10x40 grid (20 hidden buffer rows above the playfield) with row clearing
//! - [`brick`]: the falling piece, pivot rotation without wall kicks
//! - [`rng`]: 7-bag randomizer over any `rand::RngCore`
//! - [`hold`]: one swap per spawned piece
//! - [`scoring`]: line points, level progression, gravity table
//! - [`game_state`]: the fall/lock scheduler tying everything together
//! - [`snapshot`]: read-only view handed to renderers
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tui_blockfall_core::GameState;
//! use tui_blockfall_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//! game.tick(Duration::from_millis(16));
//!
//! assert_eq!(game.piece_id(), 2);
//! assert!(game.take_last_event().is_some());
//! ```
//!
//! # Timing
//!
//! - **Gravity**: 48 frames per row at level 1 down to 1 frame at level 15 (60 fps)
//! - **Soft Drop**: 20x faster than normal gravity
//! - **Lock Delay**: 500ms accumulated by gravity steps while landed
//! - **Tick clamp**: deltas above 100ms are truncated
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with elapsed time.

pub mod board;
pub mod brick;
pub mod game_state;
pub mod hold;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tui_blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use brick::{rotate_shape, spawn_position, spawn_shape, Brick, BrickShape};
pub use game_state::GameState;
pub use hold::HoldController;
pub use rng::{RandomBag, SimpleRng};
pub use scoring::{fall_interval, level_for_lines, ScoreTracker};
pub use snapshot::{ActiveSnapshot, BoardGrid, GameSnapshot, TimersSnapshot};
