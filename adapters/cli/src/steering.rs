//! Seeded random steering for the headless agent.

use maze_pursuit_core::Direction;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Picks a fresh heading for the agent every few ticks.
#[derive(Debug)]
pub(crate) struct RandomSteering {
    rng: ChaCha8Rng,
    interval: u64,
}

impl RandomSteering {
    /// Creates a policy that changes heading every `interval` ticks.
    pub(crate) fn new(seed: u64, interval: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            interval: interval.max(1),
        }
    }

    /// Heading to request before simulating `tick`, if it is time to change.
    pub(crate) fn next(&mut self, tick: u64) -> Option<Direction> {
        if tick % self.interval != 0 {
            return None;
        }
        Direction::ALL.choose(&mut self.rng).copied()
    }
}
