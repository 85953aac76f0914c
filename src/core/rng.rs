//! Seedable random source
//!
//! Effects take their randomness from an explicit [`FxRng`] so a fixed seed
//! reproduces placement, activation timing and packet spawns exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

pub type FxRng = SmallRng;

/// Deterministic generator for tests, the CLI `--seed` flag and the web `seed`
/// argument.
pub fn seeded(seed: u64) -> FxRng {
    SmallRng::seed_from_u64(seed)
}

/// Generator seeded from the platform entropy source.
pub fn from_entropy() -> FxRng {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => SmallRng::seed_from_u64(u64::from_le_bytes(bytes)),
        Err(e) => {
            warn!(error = %e, "Entropy source unavailable, using fixed seed");
            SmallRng::seed_from_u64(0x5DBE_BD00_1CE5_EED5)
        }
    }
}

/// Uniform sample in `[lo, hi)`. Degenerate ranges (`hi <= lo`) return `lo`.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    lo + rng.gen::<f64>() * (hi - lo)
}

/// Uniform sample in `[-half, half)`.
#[inline]
pub fn centered<R: Rng + ?Sized>(rng: &mut R, half: f64) -> f64 {
    uniform(rng, -half, half)
}

/// Uniform index in `0..len`; `None` for an empty collection.
#[inline]
pub fn pick<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}
