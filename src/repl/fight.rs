//! Fight rolls
//!
//! Each fighter rolls a few times in `[0, base_experience]`; the higher
//! total wins and ties are rolled again.

use rand::Rng;

/// Rolls per fighter in one round.
pub const ROLLS_PER_ROUND: usize = 3;

/// Rounds that may end in a tie before the fight is called off.
pub const MAX_ROUNDS: usize = 10;

/// One fighter's rolls for a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rolls {
    pub values: Vec<u32>,
    pub total: u32,
}

/// Rolls `ROLLS_PER_ROUND` times in `[0, base_experience]`.
pub fn roll<R: Rng>(rng: &mut R, base_experience: u32) -> Rolls {
    let values: Vec<u32> = (0..ROLLS_PER_ROUND)
        .map(|_| rng.gen_range(0..=base_experience))
        .collect();
    let total = values.iter().sum();
    Rolls { values, total }
}
