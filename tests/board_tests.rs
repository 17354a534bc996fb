//! Board tests: bounds, collision, row clearing, buffer zone

use tui_blockfall::core::Board;
use tui_blockfall::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_HEIGHT};

fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
    for x in 0..BOARD_WIDTH as i8 {
        board.place(x, y, kind);
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), 10);
    assert_eq!(board.height(), 40);
    assert_eq!(board.visible_top(), BUFFER_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None), "cell ({}, {})", x, y);
            assert!(!board.is_occupied(x, y));
        }
    }
    assert_eq!(board.filled_count(), 0);
}

#[test]
fn test_out_of_bounds_is_occupied() {
    let board = Board::new();

    assert!(board.is_occupied(-1, 25));
    assert!(board.is_occupied(BOARD_WIDTH as i8, 25));
    assert!(board.is_occupied(3, -1));
    assert!(board.is_occupied(3, BOARD_HEIGHT as i8));

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
    assert!(!board.is_within_bounds(10, 0));
    assert!(board.is_within_bounds(9, 39));
}

#[test]
fn test_place_and_out_of_bounds_place_is_ignored() {
    let mut board = Board::new();
    board.place(4, 30, PieceKind::T);
    assert_eq!(board.get(4, 30), Some(Some(PieceKind::T)));
    assert!(board.is_occupied(4, 30));

    board.place(-1, 30, PieceKind::I);
    board.place(4, 40, PieceKind::I);
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_clear_single_row_shifts_rows_above() {
    let mut board = Board::new();
    fill_row(&mut board, 39, PieceKind::I);
    board.place(0, 38, PieceKind::J);
    board.place(9, 37, PieceKind::L);

    assert!(board.is_row_full(39));
    assert_eq!(board.clear_completed_rows(), 1);

    assert_eq!(board.get(0, 39), Some(Some(PieceKind::J)));
    assert_eq!(board.get(9, 38), Some(Some(PieceKind::L)));
    assert_eq!(board.filled_count(), 2);
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut board = Board::new();
    fill_row(&mut board, 39, PieceKind::I);
    board.place(2, 38, PieceKind::S);
    fill_row(&mut board, 37, PieceKind::Z);
    board.place(5, 36, PieceKind::O);

    assert_eq!(board.clear_completed_rows(), 2);
    assert_eq!(board.get(2, 39), Some(Some(PieceKind::S)));
    assert_eq!(board.get(5, 38), Some(Some(PieceKind::O)));
    assert_eq!(board.filled_count(), 2);
}

#[test]
fn test_clear_four_rows() {
    let mut board = Board::new();
    for y in 36..40 {
        fill_row(&mut board, y, PieceKind::T);
    }
    assert_eq!(board.clear_completed_rows(), 4);
    assert_eq!(board.filled_count(), 0);
}

#[test]
fn test_full_buffer_row_is_cleared_too() {
    let mut board = Board::new();
    fill_row(&mut board, 5, PieceKind::I);
    assert_eq!(board.clear_completed_rows(), 1);
    assert_eq!(board.filled_count(), 0);
}

#[test]
fn test_nearly_full_row_stays() {
    let mut board = Board::new();
    for x in 0..9 {
        board.place(x, 39, PieceKind::I);
    }
    assert!(!board.is_row_full(39));
    assert_eq!(board.clear_completed_rows(), 0);
    assert_eq!(board.filled_count(), 9);
}

#[test]
fn test_buffer_zone_query() {
    let board = Board::new();
    let flat = [(-1, 0), (0, 0), (1, 0), (2, 0)];
    assert!(board.is_piece_in_buffer_zone(&flat, 5, 19));
    assert!(!board.is_piece_in_buffer_zone(&flat, 5, 20));

    let tall = [(0, -1), (0, 0), (0, 1), (0, 2)];
    assert!(!board.is_piece_in_buffer_zone(&tall, 5, 18));
    assert!(board.is_piece_in_buffer_zone(&tall, 5, 17));
}

#[test]
fn test_u8_grid_uses_color_ids() {
    let mut board = Board::new();
    board.place(0, 39, PieceKind::I);
    board.place(9, 20, PieceKind::Z);

    let mut grid = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
    board.write_u8_grid(&mut grid);
    assert_eq!(grid[39][0], 1);
    assert_eq!(grid[20][9], 7);
    assert_eq!(grid.iter().flatten().filter(|&&c| c != 0).count(), 2);
}

#[test]
fn test_board_clear() {
    let mut board = Board::new();
    fill_row(&mut board, 30, PieceKind::O);
    board.clear();
    assert_eq!(board, Board::new());
}
