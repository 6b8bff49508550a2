//! Deterministic per-unit RNG streams.
//!
//! # Determinism strategy
//!
//! Every randomized movement generator and every unit's AI owns an
//! independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (unit_id * MIXING_CONSTANT) XOR (stream * MIXING_CONSTANT²)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive unit IDs uniformly across the seed space.  The
//! extra `stream` input lets several generators of the same unit draw from
//! independent sequences.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::UnitId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── UnitRng ───────────────────────────────────────────────────────────────────

/// Per-unit deterministic RNG.
pub struct UnitRng(SmallRng);

impl UnitRng {
    /// Seed deterministically from the run's global seed and a unit ID.
    pub fn new(global_seed: u64, unit: UnitId) -> Self {
        Self::with_stream(global_seed, unit, 0)
    }

    /// Seed from the global seed, a unit ID and a stream discriminator.
    pub fn with_stream(global_seed: u64, unit: UnitId, stream: u64) -> Self {
        let seed = global_seed
            ^ unit.0.wrapping_mul(MIXING_CONSTANT)
            ^ stream.wrapping_mul(MIXING_CONSTANT.wrapping_mul(MIXING_CONSTANT));
        UnitRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Inclusive millisecond range helper; tolerates `min > max`.
    #[inline]
    pub fn millis(&mut self, min: u32, max: u32) -> u32 {
        if min >= max { min } else { self.0.gen_range(min..=max) }
    }
}

impl std::fmt::Debug for UnitRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UnitRng")
    }
}
