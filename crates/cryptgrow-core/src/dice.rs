//! Panic-free random draws used by the rule functions.
//!
//! `rand`'s range sampling panics on empty ranges. Rules come from user
//! config, so degenerate ranges collapse to their lower bound instead.

use rand::Rng;

/// `true` with probability `p`. Values outside `[0, 1]` saturate.
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Uniform float in `[low, high)`.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    if low < high {
        rng.random_range(low..high)
    } else {
        low
    }
}

/// Uniform integer in `[low, high)`.
pub(crate) fn uniform_u32<R: Rng + ?Sized>(rng: &mut R, (low, high): (u32, u32)) -> u32 {
    if low < high {
        rng.random_range(low..high)
    } else {
        low
    }
}

/// Uniform index in `[0, len)`. Zero for an empty collection.
pub(crate) fn index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    if len == 0 { 0 } else { rng.random_range(0..len) }
}
