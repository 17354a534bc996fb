//! RNG module - 7-bag random piece generation
//!
//! Each bag holds one of each piece kind, shuffled. Pieces are drawn until
//! the bag is empty, then a new bag is shuffled. Draws aligned to a bag
//! boundary therefore always form a permutation of the seven kinds.
//!
//! The shuffle source is any [`rand::RngCore`]. The default is a small LCG so
//! a seed fully determines the piece sequence.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state is a fixed point of the multiplier step
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    fn step(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.step());
        let low = u64::from(self.step());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Number of kinds in one bag
const BAG_SIZE: usize = PieceKind::ALL.len();

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct RandomBag<R = SimpleRng> {
    /// Current bag of pieces
    bag: [PieceKind; BAG_SIZE],
    /// Index of the next piece to draw; `BAG_SIZE` means empty
    bag_index: usize,
    rng: R,
}

impl RandomBag<SimpleRng> {
    /// Create a bag driven by the default LCG
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: RngCore> RandomBag<R> {
    /// Create a bag over an injected random source. The first draw shuffles.
    pub fn with_rng(rng: R) -> Self {
        Self {
            bag: PieceKind::ALL,
            bag_index: BAG_SIZE,
            rng,
        }
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.bag.shuffle(&mut self.rng);
        self.bag_index = 0;
    }

    /// Draw the next piece, refilling first when the bag is empty
    pub fn next_type(&mut self) -> PieceKind {
        if self.bag_index >= BAG_SIZE {
            self.refill();
        }
        let kind = self.bag[self.bag_index];
        self.bag_index += 1;
        kind
    }

    /// Pieces left before the next refill
    pub fn remaining_in_bag(&self) -> usize {
        BAG_SIZE - self.bag_index
    }

    /// Random source, for inspection
    pub fn rng(&self) -> &R {
        &self.rng
    }
}

impl<R: RngCore + Clone> RandomBag<R> {
    /// Preview the next `N` pieces without consuming them.
    ///
    /// Stack-only. Previewing across a refill runs a clone of the random
    /// source, so the preview matches the draws that follow.
    pub fn peek_queue<const N: usize>(&self) -> [PieceKind; N] {
        let mut preview = self.clone();
        std::array::from_fn(|_| preview.next_type())
    }
}

impl Default for RandomBag<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut kinds: Vec<PieceKind>) -> Vec<PieceKind> {
        kinds.sort_by_key(|k| k.color_id());
        kinds
    }

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_not_stuck() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fill_bytes_handles_partial_chunk() {
        let mut rng = SimpleRng::new(7);
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_new_bag_is_empty_until_first_draw() {
        let mut bag = RandomBag::new(1);
        assert_eq!(bag.remaining_in_bag(), 0);
        bag.next_type();
        assert_eq!(bag.remaining_in_bag(), 6);
    }

    #[test]
    fn test_each_bag_is_permutation() {
        let mut bag = RandomBag::new(42);
        for _ in 0..10 {
            let drawn: Vec<_> = (0..7).map(|_| bag.next_type()).collect();
            assert_eq!(sorted(drawn), PieceKind::ALL.to_vec());
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomBag::new(99);
        let mut b = RandomBag::new(99);
        for _ in 0..50 {
            assert_eq!(a.next_type(), b.next_type());
        }
    }

    #[test]
    fn test_peek_queue_matches_draws_across_refill() {
        let mut bag = RandomBag::new(3);
        for _ in 0..5 {
            bag.next_type();
        }

        let preview = bag.peek_queue::<5>();
        assert_eq!(bag.remaining_in_bag(), 2);
        for expected in preview {
            assert_eq!(bag.next_type(), expected);
        }
    }

    #[test]
    fn test_with_std_rng() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut bag = RandomBag::with_rng(StdRng::seed_from_u64(5));
        let drawn: Vec<_> = (0..7).map(|_| bag.next_type()).collect();
        assert_eq!(sorted(drawn), PieceKind::ALL.to_vec());
    }
}
