//! Round-local seed derivation.
//!
//! Every random draw in a match comes from the match seed plus the round (and
//! whatever else identifies the draw). Nothing keeps generator state between
//! calls, so a match restored from a snapshot replays the same racks, wheel
//! spins and reveals.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const RACK_MULTIPLIER: u64 = 7919;
const WHEEL_MULTIPLIER: u64 = 997;
const REVEAL_MULTIPLIER: u64 = 104_729;
const AMBIENCE_MULTIPLIER: u64 = 7;

/// Seed for the setter's rack in `round`.
pub fn derive_rack_seed(match_seed: u64, round: u32) -> u64 {
    match_seed.wrapping_add((round as u64).wrapping_mul(RACK_MULTIPLIER))
}

/// Seed for the wheel spin in `round`, keyed on the accepted word's length.
pub fn derive_wheel_seed(match_seed: u64, round: u32, word_len: usize) -> u64 {
    match_seed
        .wrapping_add((round as u64).wrapping_mul(WHEEL_MULTIPLIER))
        .wrapping_add(word_len as u64)
}

/// Seed for a reveal lifeline, keyed on how many letters were guessed so far.
///
/// Two reveals in the same round always see a different guessed count, so
/// they never share a seed.
pub fn derive_reveal_seed(match_seed: u64, round: u32, guessed_count: usize) -> u64 {
    match_seed
        .wrapping_add((round as u64).wrapping_mul(REVEAL_MULTIPLIER))
        .wrapping_add((guessed_count as u64).wrapping_mul(31))
        .wrapping_add(3)
}

/// Seed for ambience scheduling at `tick`.
pub fn derive_ambience_seed(match_seed: u64, tick: u64) -> u64 {
    match_seed
        .wrapping_add(tick.wrapping_mul(AMBIENCE_MULTIPLIER))
        .wrapping_add(5)
}

/// Portable generator for a derived seed.
pub fn rng_for(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
