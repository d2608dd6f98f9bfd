//! Damage arithmetic and the engine's random draws.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

/// Melee damage: `max(1, floor((attack * 2 - defense) * variation))`.
/// The floor of 1 keeps even hopeless matchups from stalling forever.
pub fn calc_damage(attack: i32, defense: i32, variation: f64) -> i32 {
    ((f64::from(attack * 2 - defense) * variation).floor() as i32).max(1)
}

/// Uniform draw from `[0.8, 1.2)`.
pub(super) fn roll_variation(rng: &mut ChaCha8Rng) -> f64 {
    0.8 + f64::from(rng.next_u32()) / (f64::from(u32::MAX) + 1.0) * 0.4
}

pub(super) fn rand_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    rng.next_u32() as usize % len
}

pub(super) fn coin_flip(rng: &mut ChaCha8Rng) -> bool {
    rng.next_u32() & 1 == 0
}
