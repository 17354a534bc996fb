//! Held-control handling for terminal input.
//!
//! A directional press moves once, then repeats every ARR after the DAS
//! delay. Soft drop is a held state: press starts it and release stops it.
//! Terminals that never report key releases are covered by a timeout that
//! releases held controls when no key of this handler has been seen.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use crate::map::Control;
use crate::types::{GameAction, DEFAULT_ARR_MS, DEFAULT_DAS_MS};

/// Upper bound on repeats emitted by a single [`InputHandler::update`].
pub const MAX_REPEATS: usize = 32;

/// Release timeout used until the terminal is known to report releases.
const DEFAULT_RELEASE_TIMEOUT_MS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shift {
    Left,
    Right,
}

impl Shift {
    fn action(self) -> GameAction {
        match self {
            Shift::Left => GameAction::MoveLeft,
            Shift::Right => GameAction::MoveRight,
        }
    }
}

/// A held direction and how far it has charged.
#[derive(Debug, Clone, Copy)]
struct Charge {
    shift: Shift,
    held_ms: u32,
    /// Time past DAS not yet spent on repeats
    carry_ms: u32,
}

impl Charge {
    fn new(shift: Shift) -> Self {
        Self {
            shift,
            held_ms: 0,
            carry_ms: 0,
        }
    }

    /// Advance by `elapsed_ms` and return how many repeats became due.
    fn advance(&mut self, elapsed_ms: u32, das_ms: u32, arr_ms: u32) -> u32 {
        let before = self.held_ms;
        self.held_ms = self.held_ms.saturating_add(elapsed_ms);
        if self.held_ms < das_ms {
            return 0;
        }

        let past_das = if before < das_ms {
            self.held_ms - das_ms
        } else {
            elapsed_ms
        };
        self.carry_ms = self.carry_ms.saturating_add(past_das);
        let due = self.carry_ms / arr_ms;
        self.carry_ms -= due * arr_ms;
        due
    }
}

/// Turns key presses and releases into game actions with auto-repeat.
#[derive(Debug, Clone)]
pub struct InputHandler {
    charge: Option<Charge>,
    soft_drop: bool,
    last_seen: Instant,
    das_ms: u32,
    arr_ms: u32,
    release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    /// ARR is clamped to at least 1ms.
    pub fn with_config(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            charge: None,
            soft_drop: false,
            last_seen: Instant::now(),
            das_ms,
            arr_ms: arr_ms.max(1),
            release_timeout_ms: DEFAULT_RELEASE_TIMEOUT_MS,
        }
    }

    /// Set the auto-release timeout. `u32::MAX` effectively disables it.
    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.release_timeout_ms
    }

    pub fn das_delay(&self) -> u32 {
        self.das_ms
    }

    pub fn arr_rate(&self) -> u32 {
        self.arr_ms
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    /// Handle a key press (or terminal auto-repeat) for a control.
    ///
    /// Repeated presses of a held control refresh the release timeout but
    /// emit nothing; repeats come from [`InputHandler::update`].
    pub fn press(&mut self, control: Control) -> Option<GameAction> {
        match control {
            Control::Left => self.hold_shift(Shift::Left),
            Control::Right => self.hold_shift(Shift::Right),
            Control::SoftDrop => {
                self.last_seen = Instant::now();
                (!std::mem::replace(&mut self.soft_drop, true)).then_some(GameAction::SoftDropStart)
            }
            Control::HardDrop => Some(GameAction::HardDrop),
            Control::RotateCw => Some(GameAction::RotateCw),
            Control::RotateCcw => Some(GameAction::RotateCcw),
            Control::Hold => Some(GameAction::Hold),
        }
    }

    /// Handle a key release. Only ending a soft drop produces an action.
    pub fn release(&mut self, control: Control) -> Option<GameAction> {
        let shift = match control {
            Control::Left => Shift::Left,
            Control::Right => Shift::Right,
            Control::SoftDrop => {
                return std::mem::take(&mut self.soft_drop).then_some(GameAction::SoftDropStop)
            }
            _ => return None,
        };
        if self.charge.map(|c| c.shift) == Some(shift) {
            self.charge = None;
        }
        None
    }

    /// Advance held controls by `elapsed_ms` and collect due repeats.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, MAX_REPEATS> {
        let mut actions = ArrayVec::new();

        let timeout = Duration::from_millis(u64::from(self.release_timeout_ms));
        if self.last_seen.elapsed() > timeout {
            self.charge = None;
            if std::mem::take(&mut self.soft_drop) {
                actions.push(GameAction::SoftDropStop);
            }
        }

        let (das_ms, arr_ms) = (self.das_ms, self.arr_ms);
        if let Some(charge) = self.charge.as_mut() {
            let due = charge.advance(elapsed_ms, das_ms, arr_ms);
            let room = (actions.capacity() - actions.len()) as u32;
            for _ in 0..due.min(room) {
                actions.push(charge.shift.action());
            }
        }
        actions
    }

    /// Forget every held control (pause, restart).
    pub fn reset(&mut self) {
        self.charge = None;
        self.soft_drop = false;
        self.last_seen = Instant::now();
    }

    fn hold_shift(&mut self, shift: Shift) -> Option<GameAction> {
        self.last_seen = Instant::now();
        if self.charge.map(|c| c.shift) == Some(shift) {
            return None;
        }
        self.charge = Some(Charge::new(shift));
        Some(shift.action())
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
