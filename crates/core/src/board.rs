//! The playfield grid.
//!
//! 10 columns by 40 rows: a 20-row hidden buffer stacked above the 20-row
//! visible field. `(x, y)` has x growing rightwards and y growing downwards;
//! rows 0..19 are the buffer. Each cell is empty or holds the kind of the
//! piece that locked there.
//!
//! Off-board coordinates count as occupied for every collision query.

use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_HEIGHT};

const W: usize = BOARD_WIDTH as usize;
const H: usize = BOARD_HEIGHT as usize;

type Row = [Cell; W];

const EMPTY_ROW: Row = [None; W];

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Top row first
    rows: [Row; H],
}

impl Board {
    pub fn new() -> Self {
        Self { rows: [EMPTY_ROW; H] }
    }

    /// Map signed coordinates to row and column indices, if on the board.
    #[inline]
    fn locate(x: i8, y: i8) -> Option<(usize, usize)> {
        let col = usize::try_from(x).ok().filter(|&c| c < W)?;
        let row = usize::try_from(y).ok().filter(|&r| r < H)?;
        Some((row, col))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Total height, buffer included
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// First row of the visible playfield
    pub fn visible_top(&self) -> u8 {
        BUFFER_HEIGHT
    }

    /// `None` off the board, `Some(cell)` otherwise.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::locate(x, y).map(|(row, col)| self.rows[row][col])
    }

    pub fn is_within_bounds(&self, x: i8, y: i8) -> bool {
        Self::locate(x, y).is_some()
    }

    /// Filled, or off the board.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        self.get(x, y).map_or(true, |cell| cell.is_some())
    }

    /// Write a locked cell. Off-board writes are ignored.
    pub fn place(&mut self, x: i8, y: i8, kind: PieceKind) {
        if let Some((row, col)) = Self::locate(x, y) {
            self.rows[row][col] = Some(kind);
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(Option::is_some))
    }

    /// Remove every full row, buffer included, and return how many went.
    ///
    /// Surviving rows keep their order and settle at the bottom; the rows
    /// freed at the top become empty.
    pub fn clear_completed_rows(&mut self) -> u32 {
        let mut dst = H;
        for src in (0..H).rev() {
            if self.is_row_full(src) {
                continue;
            }
            dst -= 1;
            if dst != src {
                self.rows[dst] = self.rows[src];
            }
        }
        self.rows[..dst].fill(EMPTY_ROW);
        dst as u32
    }

    /// True iff every cell of `shape` anchored at row `y` lies in the hidden buffer.
    pub fn is_piece_in_buffer_zone(&self, shape: &[(i8, i8)], _x: i8, y: i8) -> bool {
        shape.iter().all(|&(_, dy)| y + dy < BUFFER_HEIGHT as i8)
    }

    /// Export the grid as color ids (0 empty, 1-7 piece kind).
    pub fn write_u8_grid(&self, out: &mut [[u8; W]; H]) {
        for (dst_row, row) in out.iter_mut().zip(&self.rows) {
            for (dst, cell) in dst_row.iter_mut().zip(row) {
                *dst = cell.map_or(0, PieceKind::color_id);
            }
        }
    }

    pub fn filled_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.rows.fill(EMPTY_ROW);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
