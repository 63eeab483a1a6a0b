//! ADSR (Attack, Decay, Sustain, Release) envelope as a pure function of time.

use crate::signals::{Level, Signal, Time, UNIT_LEVEL};

/// ADSR envelope.
///
/// Generates a finite control signal with the classic shape:
/// - **Attack**: ramps from 0 to full scale over `attack`
/// - **Decay**: ramps from full scale to `sustain_level` over `decay`
/// - **Sustain**: holds `sustain_level` for `sustain`
/// - **Release**: ramps from `sustain_level` to 0 over `release`
///
/// Outside `[0, end]` the level is zero. A zero-length segment is skipped.
///
/// # Examples
///
/// ```
/// use sigwave::{Adsr, Signal, UNIT_TIME, UNIT_LEVEL};
///
/// let env = Adsr::new(UNIT_TIME, UNIT_TIME, UNIT_TIME, UNIT_LEVEL / 2, UNIT_TIME);
/// assert_eq!(env.max_x(), Some(4 * UNIT_TIME));
/// assert_eq!(env.level(UNIT_TIME * 5 / 2), UNIT_LEVEL / 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adsr {
    attack_end: Time,
    attack_slope: Level,
    decay_slope: Level,
    sustain_start: Time,
    sustain_level: Level,
    sustain_end: Time,
    release_slope: Level,
    end: Time,
}

impl Adsr {
    /// Creates an envelope from segment durations and the sustain level.
    pub fn new(
        attack: Time,
        decay: Time,
        sustain: Time,
        sustain_level: Level,
        release: Time,
    ) -> Self {
        let slope = |rise: Level, run: Time| rise.checked_div(run).unwrap_or(0);
        Self {
            attack_end: attack,
            attack_slope: slope(UNIT_LEVEL, attack),
            decay_slope: slope(UNIT_LEVEL - sustain_level, decay),
            sustain_start: attack + decay,
            sustain_level,
            sustain_end: attack + decay + sustain,
            release_slope: slope(sustain_level, release),
            end: attack + decay + sustain + release,
        }
    }

    /// Level held during the sustain segment.
    pub fn sustain_level(&self) -> Level {
        self.sustain_level
    }
}

impl Signal for Adsr {
    fn level(&self, t: Time) -> Level {
        if t > self.end {
            0
        } else if t > self.sustain_end {
            (self.end - t) * self.release_slope
        } else if t > self.sustain_start {
            self.sustain_level
        } else if t > self.attack_end {
            (self.sustain_start - t) * self.decay_slope + self.sustain_level
        } else if t > 0 {
            t * self.attack_slope
        } else {
            0
        }
    }

    fn max_x(&self) -> Option<Time> {
        Some(self.end)
    }
}
