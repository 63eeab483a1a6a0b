//! Reproducible white noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::signals::{Level, Signal, Time, UNIT_LEVEL, UNIT_TIME};

/// A white noise generator that is a pure function of time.
///
/// Time is cut into steps of `step`; every step gets its own level, drawn
/// uniformly from `[-UNIT_LEVEL, UNIT_LEVEL]` by an RNG seeded from the
/// noise seed and the step index. Evaluating the same time twice, in any
/// order or from any thread, gives the same level.
///
/// # Examples
///
/// ```
/// use sigwave::{Noise, Signal, UNIT_TIME};
///
/// let noise = Noise::new(42);
/// assert_eq!(noise.level(3 * UNIT_TIME), noise.level(3 * UNIT_TIME + 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Noise {
    seed: u64,
    step: Time,
}

impl Noise {
    /// Creates noise that changes once per `UNIT_TIME`.
    pub fn new(seed: u64) -> Self {
        Self::with_step(seed, UNIT_TIME)
    }

    /// Creates noise that changes once per `step`, at least one time unit.
    pub fn with_step(seed: u64, step: Time) -> Self {
        Self {
            seed,
            step: step.max(1),
        }
    }

    /// Seed this noise was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Duration of one random level.
    pub fn step(&self) -> Time {
        self.step
    }
}

impl Signal for Noise {
    fn level(&self, t: Time) -> Level {
        let index = t.div_euclid(self.step) as u64;
        let mut rng = StdRng::seed_from_u64(self.seed ^ index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        rng.gen_range(-UNIT_LEVEL..=UNIT_LEVEL)
    }
}
