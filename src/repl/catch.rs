//! Catch odds
//!
//! Higher base experience makes a creature harder to catch.

/// Chance of catching a creature with zero base experience.
pub const BASE_CATCH_CHANCE: f64 = 0.25;

const EXPERIENCE_FACTOR: f64 = 0.001;
const MIN_CATCH_CHANCE: f64 = 0.01;
const MAX_CATCH_CHANCE: f64 = 0.95;

/// Probability in `[0.01, 0.95]` of catching a creature.
pub fn catch_chance(base_experience: u32) -> f64 {
    let chance = BASE_CATCH_CHANCE - f64::from(base_experience) * EXPERIENCE_FACTOR;
    chance.clamp(MIN_CATCH_CHANCE, MAX_CATCH_CHANCE)
}

/// Whether a uniform `roll` in `[0, 1)` catches the creature.
pub fn is_caught(base_experience: u32, roll: f64) -> bool {
    roll <= catch_chance(base_experience)
}
