//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core simulation, terminal rendering, input mapping).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Hidden buffer**: 20 rows (indexed 0-19) stacked above the playfield
//! - **Visible playfield**: 20 rows (indexed 20-39)
//!
//! `y` grows downward, so the buffer sits at the low row indices.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LOCK_DELAY` | 500ms | Time a landed piece waits before locking |
//! | `MAX_TICK` | 100ms | Largest delta a single tick will simulate |
//! | `SOFT_DROP_DIVISOR` | 20 | Soft drop divides the fall interval by this |
//! | `FALL_INTERVAL_FRAMES` | 48..1 | Frames per row (60 fps) for levels 1-15 |
//!
//! # Examples
//!
//! ```
//! use tui_blockfall_types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_HEIGHT};
//!
//! assert_eq!(PieceKind::T.color_id(), 6);
//! assert_eq!(PieceKind::from_color_id(1), Some(PieceKind::I));
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 40);
//! assert_eq!(BUFFER_HEIGHT, 20);
//! ```

use std::time::Duration;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Rows of the playfield the player can see
pub const VISIBLE_HEIGHT: u8 = 20;

/// Hidden rows stacked above the visible playfield
pub const BUFFER_HEIGHT: u8 = 20;

/// Total board height, buffer included
pub const BOARD_HEIGHT: u8 = VISIBLE_HEIGHT + BUFFER_HEIGHT;

/// Lock delay for a landed piece.
pub const LOCK_DELAY: Duration = Duration::from_millis(500);

/// Deltas above this are truncated before simulation.
pub const MAX_TICK: Duration = Duration::from_millis(100);

/// Soft drop divides the fall interval by this factor.
pub const SOFT_DROP_DIVISOR: u32 = 20;

/// Gravity is expressed in frames of this rate.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Frames per row for levels 1 through 15.
pub const FALL_INTERVAL_FRAMES: [u32; 15] = [48, 43, 38, 33, 28, 23, 18, 13, 8, 6, 5, 4, 3, 2, 1];

/// Line clear base points, indexed by the number of lines (1-4).
///
/// Points are multiplied by the level in effect before the clear.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Lines needed per level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Starting level
pub const MIN_LEVEL: u32 = 1;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 15;

/// Number of upcoming pieces exposed to renderers.
pub const NEXT_PREVIEW: usize = 5;

/// DAS (Delayed Auto Shift) delay in milliseconds.
pub const DEFAULT_DAS_MS: u32 = 150;

/// ARR (Auto Repeat Rate) in milliseconds.
pub const DEFAULT_ARR_MS: u32 = 50;

/// Frame-loop tick in milliseconds (about 60 fps).
pub const TICK_MS: u32 = 16;

/// Steps shown by the resume countdown.
pub const COUNTDOWN_STEPS: u32 = 3;

/// Length of a single countdown step (two thirds of a second).
pub const COUNTDOWN_STEP: Duration = Duration::from_nanos(666_666_667);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_is_buffer_plus_visible() {
        assert_eq!(BOARD_HEIGHT, 40);
        assert_eq!(BOARD_HEIGHT - BUFFER_HEIGHT, VISIBLE_HEIGHT);
    }

    #[test]
    fn fall_table_covers_every_level() {
        assert_eq!(FALL_INTERVAL_FRAMES.len() as u32, MAX_LEVEL - MIN_LEVEL + 1);
        assert!(FALL_INTERVAL_FRAMES.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn color_ids_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_color_id(kind.color_id()), Some(kind));
        }
        assert_eq!(PieceKind::from_color_id(0), None);
        assert_eq!(PieceKind::from_color_id(8), None);
    }
}

/// The seven piece kinds
///
/// The declaration order fixes the board color id (`I` = 1 ... `Z` = 7):
/// - **I**: Cyan, horizontal bar
/// - **J**: Blue
/// - **L**: Orange
/// - **O**: Yellow, 2x2 square (never rotates)
/// - **S**: Green
/// - **T**: Purple
/// - **Z**: Red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Every kind, in color id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Board color id (1-7, 0 is reserved for empty cells)
    pub fn color_id(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::color_id`]
    ///
    /// ```
    /// use tui_blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_color_id(4), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_color_id(0), None);
    /// ```
    pub fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Uppercase letter used by renderers and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These are already de-duplicated by the input layer: auto-repeat produces
/// a stream of discrete `MoveLeft`/`MoveRight` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Begin accelerated gravity
    SoftDropStart,
    /// Return to normal gravity
    SoftDropStop,
    /// Drop to the lowest valid position and lock at once
    HardDrop,
    /// Rotate piece 90° clockwise around its pivot
    RotateCw,
    /// Rotate piece 90° counter-clockwise around its pivot
    RotateCcw,
    /// Swap with the hold slot (once per spawn)
    Hold,
    /// Re-initialize every component and spawn a fresh piece
    Restart,
}

/// Scheduler state for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Gravity moves the piece down each interval
    Falling,
    /// The piece is landed and the lock timer is running
    Locking,
    /// Terminal until restart
    GameOver,
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverKind {
    /// A freshly spawned piece overlapped the stack
    BlockOut,
    /// A piece locked without any cell reaching the visible playfield
    LockOut,
}

impl GameOverKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverKind::BlockOut => "block_out",
            GameOverKind::LockOut => "lock_out",
        }
    }
}

/// Scheduler-level gates. While any gate is set, ticks are skipped and timers freeze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    Paused,
    Help,
    Countdown,
}

impl Gate {
    /// Bit used in the scheduler's gate mask.
    pub fn bit(self) -> u8 {
        match self {
            Gate::Paused => 1 << 0,
            Gate::Help => 1 << 1,
            Gate::Countdown => 1 << 2,
        }
    }
}

/// Core-side event emitted after a piece locks.
///
/// Observers (the event log) take it once via `GameState::take_last_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub episode_id: u32,
    /// Id of the piece that locked
    pub piece_id: u32,
    pub kind: PieceKind,
    pub lines_cleared: u32,
    pub points: u32,
    pub score: u32,
    /// Level after the clear was counted
    pub level: u32,
    pub hard_drop: bool,
    pub game_over: Option<GameOverKind>,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;
