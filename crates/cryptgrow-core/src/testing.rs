//! Test doubles shared by the unit tests.

use rand::RngCore;

/// An RNG that always returns the maximum value.
///
/// Every probability roll misses, so lighting failures and hazards never
/// fire, and range draws land at the top of their range.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NeverRng;

impl RngCore for NeverRng {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }

    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(u8::MAX);
    }
}
