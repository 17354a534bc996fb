//! Game state module - the fall/lock scheduler
//!
//! Ties the board, the active brick, the bag, the hold slot and the score
//! tracker together. It owns every timer and decides when gravity moves the
//! piece, when a landed piece locks, and when the game is over.
//!
//! Per tick the delta is clamped to [`MAX_TICK`] and added to the fall timer.
//! Each whole fall interval in the timer is one gravity step: a falling piece
//! moves down (and its lock timer restarts), a landed piece accumulates the
//! interval on its lock timer and locks once that reaches [`LOCK_DELAY`].
//! Sideways moves and rotations never touch the lock timer.

use std::time::Duration;

use rand::RngCore;

use crate::board::Board;
use crate::brick::Brick;
use crate::hold::HoldController;
use crate::rng::{RandomBag, SimpleRng};
use crate::scoring::{fall_interval, ScoreTracker};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
use crate::types::{
    GameAction, GameOverKind, Gate, LockEvent, PieceKind, Phase, LOCK_DELAY, MAX_TICK,
    NEXT_PREVIEW, SOFT_DROP_DIVISOR,
};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng> {
    board: Board,
    active: Option<Brick>,
    bag: RandomBag<R>,
    hold: HoldController,
    score: ScoreTracker,
    next_queue: [PieceKind; NEXT_PREVIEW],
    phase: Phase,
    game_over: Option<GameOverKind>,
    fall_timer: Duration,
    lock_timer: Duration,
    fall_interval: Duration,
    soft_drop: bool,
    /// Bitmask of `Gate::bit` values
    gates: u8,
    started: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id of naturally spawned pieces. Hold respawns keep the id.
    piece_id: u32,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
}

impl GameState<SimpleRng> {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: RngCore + Clone> GameState<R> {
    /// Create a new game drawing pieces from an injected random source
    pub fn with_rng(rng: R) -> Self {
        let bag = RandomBag::with_rng(rng);
        let next_queue = bag.peek_queue();
        let score = ScoreTracker::new();

        Self {
            board: Board::new(),
            active: None,
            bag,
            hold: HoldController::new(),
            next_queue,
            fall_interval: fall_interval(score.level()),
            score,
            phase: Phase::Falling,
            game_over: None,
            fall_timer: Duration::ZERO,
            lock_timer: Duration::ZERO,
            soft_drop: false,
            gates: 0,
            started: false,
            episode_id: 0,
            piece_id: 0,
            last_event: None,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_next();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Brick> {
        self.active.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> Option<GameOverKind> {
        self.game_over
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn level(&self) -> u32 {
        self.score.level()
    }

    pub fn lines(&self) -> u32 {
        self.score.lines()
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.hold.held()
    }

    pub fn can_hold(&self) -> bool {
        self.hold.can_hold()
    }

    pub fn next_queue(&self) -> &[PieceKind; NEXT_PREVIEW] {
        &self.next_queue
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn fall_timer(&self) -> Duration {
        self.fall_timer
    }

    pub fn lock_timer(&self) -> Duration {
        self.lock_timer
    }

    /// Gravity interval for the current level, ignoring soft drop
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    /// Interval actually used by the next gravity step
    pub fn effective_interval(&self) -> Duration {
        if self.soft_drop {
            self.fall_interval / SOFT_DROP_DIVISOR
        } else {
            self.fall_interval
        }
    }

    pub fn set_gate(&mut self, gate: Gate, on: bool) {
        if on {
            self.gates |= gate.bit();
        } else {
            self.gates &= !gate.bit();
        }
    }

    pub fn has_gate(&self, gate: Gate) -> bool {
        self.gates & gate.bit() != 0
    }

    /// True while any gate freezes the simulation
    pub fn is_gated(&self) -> bool {
        self.gates != 0
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Cells where the active piece would land
    pub fn ghost_cells(&self) -> Option<[(i8, i8); 4]> {
        self.active
            .as_ref()
            .map(|brick| brick.ghost_cells(&self.board))
    }

    fn accepts_gameplay(&self) -> bool {
        self.started && self.game_over.is_none() && !self.is_gated()
    }

    /// Advance the simulation by `dt`.
    ///
    /// Returns true when the piece moved or locked.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if !self.accepts_gameplay() {
            return false;
        }

        let interval = self.effective_interval();
        self.fall_timer += dt.min(MAX_TICK);

        let mut changed = false;
        while self.fall_timer >= interval {
            self.fall_timer -= interval;

            let Some(brick) = self.active.as_mut() else {
                break;
            };

            if brick.is_landed(&self.board) {
                self.phase = Phase::Locking;
                self.lock_timer += interval;
                if self.lock_timer >= LOCK_DELAY {
                    self.commit_lock(false);
                    return true;
                }
            } else {
                brick.move_down(&self.board);
                self.lock_timer = Duration::ZERO;
                self.phase = Phase::Falling;
                changed = true;
            }
        }

        changed
    }

    /// Apply a game action
    ///
    /// Returns false when the action was rejected or had no effect. Everything
    /// except `Restart` is ignored before start, after game over, and while gated.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Restart => {
                self.restart();
                true
            }
            _ if !self.accepts_gameplay() => false,
            GameAction::MoveLeft => self.with_active(|brick, board| brick.move_left(board)),
            GameAction::MoveRight => self.with_active(|brick, board| brick.move_right(board)),
            GameAction::RotateCw => self.with_active(|brick, board| brick.rotate_cw(board)),
            GameAction::RotateCcw => self.with_active(|brick, board| brick.rotate_ccw(board)),
            GameAction::SoftDropStart => self.soft_drop_start(),
            GameAction::SoftDropStop => {
                let was_dropping = self.soft_drop;
                self.soft_drop = false;
                was_dropping
            }
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Hold => self.hold(),
        }
    }

    fn with_active(&mut self, f: impl FnOnce(&mut Brick, &Board) -> bool) -> bool {
        match self.active.as_mut() {
            Some(brick) => f(brick, &self.board),
            None => false,
        }
    }

    fn soft_drop_start(&mut self) -> bool {
        self.soft_drop = true;
        if let Some(brick) = self.active.as_mut() {
            if brick.move_down(&self.board) {
                self.fall_timer = Duration::ZERO;
            }
        }
        true
    }

    /// Drop the active piece to its landing row and lock it at once
    fn hard_drop(&mut self) -> bool {
        let Some(brick) = self.active.as_mut() else {
            return false;
        };
        while brick.move_down(&self.board) {}
        self.commit_lock(true);
        true
    }

    /// Swap the active piece with the hold slot
    fn hold(&mut self) -> bool {
        let Some(brick) = self.active.as_mut() else {
            return false;
        };
        if !self.hold.hold(brick, &mut self.bag) {
            return false;
        }

        let blocked = brick.check_spawn_collision(&self.board);
        self.next_queue = self.bag.peek_queue();
        self.fall_timer = Duration::ZERO;
        self.lock_timer = Duration::ZERO;
        self.phase = Phase::Falling;

        if blocked {
            self.enter_game_over(GameOverKind::BlockOut);
        }
        true
    }

    /// Write the active piece into the board, clear rows, score, and spawn.
    fn commit_lock(&mut self, hard_drop: bool) {
        let Some(brick) = self.active.take() else {
            return;
        };

        let kind = brick.kind();
        let piece_id = self.piece_id;
        let locked_out = brick.is_in_buffer_zone(&self.board);
        brick.lock_into(&mut self.board);

        let lines_cleared = self.board.clear_completed_rows();
        let level_before = self.score.level();
        let points = self.score.add_lines(lines_cleared, level_before);
        self.fall_interval = fall_interval(self.score.level());
        self.fall_timer = Duration::ZERO;
        self.lock_timer = Duration::ZERO;

        let game_over = if locked_out {
            self.enter_game_over(GameOverKind::LockOut);
            Some(GameOverKind::LockOut)
        } else if self.spawn_next() {
            None
        } else {
            Some(GameOverKind::BlockOut)
        };

        self.last_event = Some(LockEvent {
            episode_id: self.episode_id,
            piece_id,
            kind,
            lines_cleared,
            points,
            score: self.score.score(),
            level: self.score.level(),
            hard_drop,
            game_over,
        });
    }

    /// Spawn the next piece from the bag. Returns false on block out.
    fn spawn_next(&mut self) -> bool {
        let brick = Brick::spawn(self.bag.next_type());
        self.next_queue = self.bag.peek_queue();
        self.hold.on_spawn();
        self.fall_timer = Duration::ZERO;
        self.lock_timer = Duration::ZERO;
        self.phase = Phase::Falling;

        if brick.check_spawn_collision(&self.board) {
            self.enter_game_over(GameOverKind::BlockOut);
            return false;
        }

        self.piece_id = self.piece_id.wrapping_add(1);
        self.active = Some(brick);
        true
    }

    fn enter_game_over(&mut self, kind: GameOverKind) {
        self.active = None;
        self.phase = Phase::GameOver;
        self.game_over = Some(kind);
        self.soft_drop = false;
    }

    /// Clear the board, score, hold and timers and spawn a fresh piece.
    ///
    /// The bag keeps its sequence and the gates are left to their owner.
    pub fn restart(&mut self) {
        self.board.clear();
        self.active = None;
        self.hold.reset();
        self.score.reset();
        self.fall_interval = fall_interval(self.score.level());
        self.game_over = None;
        self.soft_drop = false;
        self.last_event = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.started = true;
        self.spawn_next();
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.active.as_ref().map(ActiveSnapshot::from);
        out.ghost = self.ghost_cells();
        out.hold = self.hold.held();
        out.can_hold = self.hold.can_hold();
        out.next_queue = self.next_queue;
        out.phase = self.phase;
        out.game_over = self.game_over;
        out.gated = self.gates;
        out.soft_dropping = self.soft_drop;
        out.started = self.started;
        out.episode_id = self.episode_id;
        out.piece_id = self.piece_id;
        out.score = self.score.score();
        out.level = self.score.level();
        out.lines = self.score.lines();
        out.timers = TimersSnapshot {
            fall: self.fall_timer,
            lock: self.lock_timer,
            fall_interval: self.fall_interval,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}
