//! Hold slot - one swap per spawned piece

use rand::RngCore;

use crate::brick::Brick;
use crate::rng::RandomBag;
use crate::types::PieceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldController {
    held: Option<PieceKind>,
    can_hold: bool,
}

impl HoldController {
    pub fn new() -> Self {
        Self {
            held: None,
            can_hold: true,
        }
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Swap the active brick with the hold slot.
    ///
    /// An empty slot takes the active kind and the brick respawns from the
    /// bag. A full slot trades kinds and the bag is left alone. Either way the
    /// brick restarts at the spawn position. Returns false when a hold was
    /// already used since the last natural spawn.
    pub fn hold<R: RngCore>(&mut self, brick: &mut Brick, bag: &mut RandomBag<R>) -> bool {
        if !self.can_hold {
            return false;
        }

        let current = brick.kind();
        let next = match self.held.replace(current) {
            Some(held) => held,
            None => bag.next_type(),
        };
        brick.respawn(next);
        self.can_hold = false;
        true
    }

    /// Re-arm the slot. Called on natural spawns only.
    pub fn on_spawn(&mut self) {
        self.can_hold = true;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for HoldController {
    fn default() -> Self {
        Self::new()
    }
}
