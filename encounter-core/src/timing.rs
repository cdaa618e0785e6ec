//! Tick-rate conversion and the seedable simulation RNG.
//!
//! The core never reads a clock. Durations are counted in ticks at
//! `NOMINAL_TICK_RATE`; `TickRate` rescales them (and per-tick speeds) for a
//! host that steps at a different fixed rate.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::constants::NOMINAL_TICK_RATE;

/// RNG threaded through every update that needs randomness
pub type SimRng = Xoshiro256PlusPlus;

/// Create the simulation RNG from a seed
pub fn seeded_rng(seed: u64) -> SimRng {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Fixed update rate of the host, in ticks per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRate(u32);

impl TickRate {
    pub const NOMINAL: TickRate = TickRate(NOMINAL_TICK_RATE);

    /// Zero is clamped to one tick per second.
    pub fn new(ticks_per_second: u32) -> Self {
        Self(ticks_per_second.max(1))
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.0
    }

    /// Convert a nominal tick count to this rate, never rounding a non-zero
    /// duration down to zero. Saturates at `u32::MAX`.
    pub fn ticks(&self, nominal_ticks: u32) -> u32 {
        if nominal_ticks == 0 {
            return 0;
        }
        let scaled = (u64::from(nominal_ticks) * u64::from(self.0)
            + u64::from(NOMINAL_TICK_RATE / 2))
            / u64::from(NOMINAL_TICK_RATE);
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    }

    /// Convert a per-tick distance at the nominal rate to this rate
    pub fn per_tick(&self, nominal_per_tick: f32) -> f32 {
        nominal_per_tick * NOMINAL_TICK_RATE as f32 / self.0 as f32
    }

    pub fn seconds(&self, ticks: u64) -> f64 {
        ticks as f64 / self.0 as f64
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self::NOMINAL
    }
}
