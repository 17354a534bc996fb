use std::time::Duration;

use crate::brick::{Brick, BrickShape};
use crate::types::{
    GameOverKind, PieceKind, Phase, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_HEIGHT, MIN_LEVEL,
    NEXT_PREVIEW,
};

/// Color id grid for the full board, buffer included
pub type BoardGrid = [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub shape: BrickShape,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Absolute board cells of the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape.map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}

impl From<&Brick> for ActiveSnapshot {
    fn from(value: &Brick) -> Self {
        Self {
            kind: value.kind(),
            shape: *value.shape(),
            x: value.x(),
            y: value.y(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    pub fall: Duration,
    pub lock: Duration,
    pub fall_interval: Duration,
}

/// Read-only view of one game, filled by `GameState::snapshot_into`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: BoardGrid,
    pub active: Option<ActiveSnapshot>,
    /// Absolute cells where the active piece would land
    pub ghost: Option<[(i8, i8); 4]>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next_queue: [PieceKind; NEXT_PREVIEW],
    pub phase: Phase,
    pub game_over: Option<GameOverKind>,
    /// Gate bitmask (`Gate::bit`)
    pub gated: u8,
    pub soft_dropping: bool,
    pub started: bool,
    pub episode_id: u32,
    pub piece_id: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    /// Rows of the visible playfield, top to bottom
    pub fn visible_rows(&self) -> &[[u8; BOARD_WIDTH as usize]] {
        &self.board[BUFFER_HEIGHT as usize..]
    }

    pub fn playable(&self) -> bool {
        self.started && self.game_over.is_none() && self.gated == 0
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost: None,
            hold: None,
            can_hold: true,
            next_queue: [PieceKind::I; NEXT_PREVIEW],
            phase: Phase::Falling,
            game_over: None,
            gated: 0,
            soft_dropping: false,
            started: false,
            episode_id: 0,
            piece_id: 0,
            score: 0,
            level: MIN_LEVEL,
            lines: 0,
            timers: TimersSnapshot::default(),
        }
    }
}
