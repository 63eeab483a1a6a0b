//! Closed-form leaf signals.

use std::f64::consts::TAU;

use crate::signals::{Level, Signal, Time, UNIT_LEVEL};

/// A signal that always returns the same level.
///
/// # Examples
///
/// ```
/// use sigwave::{Constant, Signal, UNIT_LEVEL};
///
/// let half = Constant(UNIT_LEVEL / 2);
/// assert_eq!(half.level(-1_000), UNIT_LEVEL / 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub Level);

impl Signal for Constant {
    fn level(&self, _t: Time) -> Level {
        self.0
    }
}

/// A full-scale sine wave starting at zero and rising.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sine {
    period: Time,
}

impl Sine {
    /// Creates a sine wave repeating every `period`.
    pub fn new(period: Time) -> Self {
        Self { period }
    }
}

impl Signal for Sine {
    fn level(&self, t: Time) -> Level {
        ((t as f64 / self.period as f64 * TAU).sin() * UNIT_LEVEL as f64) as Level
    }

    fn period(&self) -> Option<Time> {
        Some(self.period)
    }
}

/// Full scale up to and including `width`, zero afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    width: Time,
}

impl Pulse {
    /// Creates a pulse ending at `width`.
    pub fn new(width: Time) -> Self {
        Self { width }
    }
}

impl Signal for Pulse {
    fn level(&self, t: Time) -> Level {
        if t > self.width { 0 } else { UNIT_LEVEL }
    }

    fn max_x(&self) -> Option<Time> {
        Some(self.width)
    }
}

/// Symmetric square wave: positive full scale for the first half of each
/// period, negative full scale for the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    period: Time,
}

impl Square {
    /// Creates a square wave repeating every `period`.
    ///
    /// A `period` below one time unit is raised to one.
    pub fn new(period: Time) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

impl Signal for Square {
    fn level(&self, t: Time) -> Level {
        if t.rem_euclid(self.period) >= self.period / 2 {
            -UNIT_LEVEL
        } else {
            UNIT_LEVEL
        }
    }

    fn period(&self) -> Option<Time> {
        Some(self.period)
    }
}

/// Linear ramp from zero at `t = 0` to full scale at `t = period`, held
/// either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampUp {
    period: Time,
}

impl RampUp {
    /// Creates a ramp lasting `period`.
    ///
    /// A `period` below one time unit is raised to one.
    pub fn new(period: Time) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

impl Signal for RampUp {
    fn level(&self, t: Time) -> Level {
        if t < 0 {
            0
        } else if t > self.period {
            UNIT_LEVEL
        } else {
            UNIT_LEVEL / self.period * t
        }
    }
}

/// Linear ramp from full scale at `t = 0` to zero at `t = period`, held
/// either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampDown {
    period: Time,
}

impl RampDown {
    /// Creates a ramp lasting `period`.
    ///
    /// A `period` below one time unit is raised to one.
    pub fn new(period: Time) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

impl Signal for RampDown {
    fn level(&self, t: Time) -> Level {
        if t < 0 {
            UNIT_LEVEL
        } else if t > self.period {
            0
        } else {
            UNIT_LEVEL / self.period * (self.period - t)
        }
    }
}

/// Unit step (Heaviside): zero before `t = 0`, full scale from then on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step;

impl Signal for Step {
    fn level(&self, t: Time) -> Level {
        if t < 0 { 0 } else { UNIT_LEVEL }
    }
}

/// Logistic curve through half scale at `t = 0`.
///
/// Larger `steepness` values give a gentler slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sigmoid {
    steepness: Time,
}

impl Sigmoid {
    /// Creates a sigmoid with the given steepness.
    pub fn new(steepness: Time) -> Self {
        Self { steepness }
    }
}

impl Signal for Sigmoid {
    fn level(&self, t: Time) -> Level {
        (UNIT_LEVEL as f64 / (1.0 + (-(t as f64) / self.steepness as f64).exp())) as Level
    }
}
