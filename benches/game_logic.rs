use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tui_blockfall::core::{Board, GameSnapshot, GameState};
use tui_blockfall::term::{FrameBuffer, GameView, Overlay, PlayerView, Viewport};
use tui_blockfall::types::{GameAction, PieceKind};

const SEED: u32 = 12345;

fn running_game() -> GameState {
    let mut game = GameState::new(SEED);
    game.start();
    game
}

fn stacked_board(rows: i8) -> Board {
    let mut board = Board::new();
    for y in 40 - rows..40 {
        (0..10).for_each(|x| board.place(x, y, PieceKind::I));
    }
    board
}

fn engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    let mut game = running_game();
    group.bench_function("tick_16ms", |b| {
        b.iter(|| {
            if game.is_game_over() {
                game.restart();
            }
            game.tick(black_box(Duration::from_millis(16)))
        })
    });

    group.bench_function("clear_4_rows", |b| {
        b.iter_batched(
            || stacked_board(4),
            |mut board| board.clear_completed_rows(),
            BatchSize::SmallInput,
        )
    });

    let mut game = running_game();
    group.bench_function("hard_drop_and_spawn", |b| {
        b.iter(|| {
            if game.is_game_over() {
                game.restart();
            }
            game.apply_action(black_box(GameAction::HardDrop))
        })
    });

    let mut game = running_game();
    let wiggle = [
        GameAction::MoveRight,
        GameAction::RotateCw,
        GameAction::MoveLeft,
        GameAction::RotateCcw,
    ];
    group.bench_function("move_and_rotate", |b| {
        b.iter(|| wiggle.iter().filter(|&&a| game.apply_action(a)).count())
    });

    group.finish();
}

fn render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let game = running_game();
    let mut snap = GameSnapshot::default();
    group.bench_function("snapshot_into", |b| {
        b.iter(|| game.snapshot_into(black_box(&mut snap)))
    });

    let snap = game.snapshot();
    let view = GameView::default();
    let viewport = Viewport::new(80, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);
    group.bench_function("game_view_80x24", |b| {
        b.iter(|| {
            let players = [PlayerView { tag: "PLAYER", snap: &snap }];
            view.render_into(&players, Overlay::None, viewport, black_box(&mut fb))
        })
    });

    group.finish();
}

criterion_group!(benches, engine, render);
criterion_main!(benches);
