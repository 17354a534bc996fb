//! Brick module - the falling piece
//!
//! A brick is a value type: its kind, four cell offsets around an anchor, and
//! the anchor itself. It never stores a handle to the board; every query takes
//! `&Board`, and the only write is [`Brick::lock_into`], which consumes it.
//!
//! Rotation is a plain pivot rotation without wall kicks. The pivot is the
//! second offset of the shape, which rotation never moves.

use crate::board::Board;
use crate::types::{PieceKind, BOARD_WIDTH, BUFFER_HEIGHT};

/// Offset of a single cell relative to the brick anchor
pub type CellOffset = (i8, i8);

/// Shape of a brick - 4 cell offsets from the anchor
pub type BrickShape = [CellOffset; 4];

/// Index of the pivot cell within a shape
const PIVOT: usize = 1;

/// Canonical spawn offsets for a piece kind
pub fn spawn_shape(kind: PieceKind) -> BrickShape {
    match kind {
        PieceKind::I => [(-1, 0), (0, 0), (1, 0), (2, 0)],
        PieceKind::J => [(-1, 0), (0, 0), (1, 0), (1, 1)],
        PieceKind::L => [(-1, 1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
        PieceKind::S => [(-1, 1), (0, 1), (0, 0), (1, 0)],
        PieceKind::T => [(-1, 0), (0, 0), (1, 0), (0, 1)],
        PieceKind::Z => [(-1, 0), (0, 0), (0, 1), (1, 1)],
    }
}

/// Spawn anchor for a piece kind.
///
/// Pieces appear in the top two rows of the visible playfield; the
/// single-row I sits one row lower so every kind shares the same bottom row.
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    let x = (BOARD_WIDTH / 2) as i8;
    let y = match kind {
        PieceKind::I => BUFFER_HEIGHT as i8 + 1,
        _ => BUFFER_HEIGHT as i8,
    };
    (x, y)
}

/// Rotate `shape` a quarter turn around its pivot cell
pub fn rotate_shape(shape: &BrickShape, clockwise: bool) -> BrickShape {
    let (px, py) = shape[PIVOT];
    shape.map(|(cx, cy)| {
        let (dx, dy) = (cx - px, cy - py);
        let (rx, ry) = if clockwise { (-dy, dx) } else { (dy, -dx) };
        (px + rx, py + ry)
    })
}

/// Active falling piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Brick {
    kind: PieceKind,
    shape: BrickShape,
    x: i8,
    y: i8,
}

impl Brick {
    /// Create a brick at the spawn position with its canonical shape
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            shape: spawn_shape(kind),
            x,
            y,
        }
    }

    /// Reset in place to a fresh spawn of `kind`
    pub fn respawn(&mut self, kind: PieceKind) {
        *self = Self::spawn(kind);
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn shape(&self) -> &BrickShape {
        &self.shape
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    /// Absolute board cells covered by the brick
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape.map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    fn fits(board: &Board, shape: &BrickShape, x: i8, y: i8) -> bool {
        shape.iter().all(|&(dx, dy)| {
            let (cx, cy) = (x + dx, y + dy);
            board.is_within_bounds(cx, cy) && !board.is_occupied(cx, cy)
        })
    }

    /// Check if every cell translated by (dx, dy) is free
    pub fn can_move(&self, board: &Board, dx: i8, dy: i8) -> bool {
        Self::fits(board, &self.shape, self.x + dx, self.y + dy)
    }

    fn try_shift(&mut self, board: &Board, dx: i8, dy: i8) -> bool {
        if !self.can_move(board, dx, dy) {
            return false;
        }
        self.x += dx;
        self.y += dy;
        true
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_shift(board, -1, 0)
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_shift(board, 1, 0)
    }

    pub fn move_down(&mut self, board: &Board) -> bool {
        self.try_shift(board, 0, 1)
    }

    /// Check if the brick is resting on the stack or the floor
    pub fn is_landed(&self, board: &Board) -> bool {
        !self.can_move(board, 0, 1)
    }

    fn try_rotate(&mut self, board: &Board, clockwise: bool) -> bool {
        if self.kind == PieceKind::O {
            return false;
        }
        let candidate = rotate_shape(&self.shape, clockwise);
        if !Self::fits(board, &candidate, self.x, self.y) {
            return false;
        }
        self.shape = candidate;
        true
    }

    pub fn rotate_cw(&mut self, board: &Board) -> bool {
        self.try_rotate(board, true)
    }

    pub fn rotate_ccw(&mut self, board: &Board) -> bool {
        self.try_rotate(board, false)
    }

    /// True when the brick overlaps the stack or leaves the board where it stands
    pub fn check_spawn_collision(&self, board: &Board) -> bool {
        !Self::fits(board, &self.shape, self.x, self.y)
    }

    /// True when no cell of the brick has reached the visible playfield
    pub fn is_in_buffer_zone(&self, board: &Board) -> bool {
        board.is_piece_in_buffer_zone(&self.shape, self.x, self.y)
    }

    /// Rows the brick can still fall before landing
    pub fn drop_distance(&self, board: &Board) -> i8 {
        let mut distance = 0;
        while self.can_move(board, 0, distance + 1) {
            distance += 1;
        }
        distance
    }

    /// Absolute cells of the lowest valid placement straight down
    pub fn ghost_cells(&self, board: &Board) -> [(i8, i8); 4] {
        let distance = self.drop_distance(board);
        self.shape
            .map(|(dx, dy)| (self.x + dx, self.y + dy + distance))
    }

    /// Write the brick into the board. This ends the brick's life.
    pub fn lock_into(self, board: &mut Board) {
        for (x, y) in self.cells() {
            board.place(x, y, self.kind);
        }
    }

    /// Build a brick at an explicit anchor (scenario tests)
    #[cfg(test)]
    pub(crate) fn at(kind: PieceKind, shape: BrickShape, x: i8, y: i8) -> Self {
        Self { kind, shape, x, y }
    }
}
