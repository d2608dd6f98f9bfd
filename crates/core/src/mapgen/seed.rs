//! Deterministic seed derivation and small sampling helpers.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

/// Avalanche-mixes the run seed with the floor index so adjacent floors get
/// uncorrelated generator streams.
pub fn derive_floor_seed(run_seed: u64, floor_index: u32) -> u64 {
    let mut mixed = run_seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= u64::from(floor_index).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

/// Uniform draw from `min..=max`.
pub(super) fn rand_usize(rng: &mut ChaCha8Rng, min: usize, max: usize) -> usize {
    debug_assert!(min <= max);
    min + (rng.next_u32() as usize) % (max - min + 1)
}

pub(super) fn rand_bool(rng: &mut ChaCha8Rng) -> bool {
    rng.next_u32() & 1 == 0
}

/// Uniform draw from `[0, 1)`.
pub(super) fn rand_unit(rng: &mut ChaCha8Rng) -> f64 {
    f64::from(rng.next_u32()) / f64::from(u32::MAX) * (1.0 - f64::EPSILON)
}
