//! Fluent construction of signal trees.

use super::{Level, Signal, Time};
use crate::combinators::{Add, Multiply, Stack};
use crate::modifiers::{
    Delay, Invert, Loop, ProgressiveSpeedUp, Reflect, Reverse, SpeedUp, TimeWarp, Trigger,
};

/// Extension trait providing modifier and combinator constructors on any `Signal`.
///
/// This trait is automatically implemented for every sized `Signal` that is
/// `'static`, so trees can be built by chaining:
///
/// ```
/// use sigwave::{Signal, SignalExt, Sine, Adsr, UNIT_TIME, UNIT_LEVEL};
///
/// let note = Sine::new(UNIT_TIME / 100)
///     .multiply(Adsr::new(UNIT_TIME / 10, UNIT_TIME / 10, UNIT_TIME, UNIT_LEVEL / 2, UNIT_TIME / 2))
///     .delay(UNIT_TIME);
///
/// assert_eq!(note.level(0), 0);
/// ```
pub trait SignalExt: Signal + Sized + 'static {
    /// Moves this signal to the heap behind a trait object.
    fn boxed(self) -> Box<dyn Signal> {
        Box::new(self)
    }

    /// Shifts this signal later in time by `delay`.
    fn delay(self, delay: Time) -> Delay<Self> {
        Delay::new(self, delay)
    }

    /// Runs this signal's time `factor` times faster.
    fn speed_up(self, factor: f64) -> SpeedUp<Self> {
        SpeedUp::new(self, factor)
    }

    /// Runs this signal's time ever faster, `t + t²/rate`.
    fn progressive_speed_up(self, rate: Time) -> ProgressiveSpeedUp<Self> {
        ProgressiveSpeedUp::new(self, rate)
    }

    /// Repeats the first `length` of this signal.
    fn looped(self, length: Time) -> Loop<Self> {
        Loop::new(self, length)
    }

    /// Negates this signal's level.
    fn invert(self) -> Invert<Self> {
        Invert::new(self)
    }

    /// Runs this signal's time backwards.
    fn reverse(self) -> Reverse<Self> {
        Reverse::new(self)
    }

    /// Folds this signal's level around full scale.
    fn reflect(self) -> Reflect<Self> {
        Reflect::new(self)
    }

    /// Stretches this signal's time in proportion to `modulation`.
    fn warp<M: Signal + 'static>(self, modulation: M, factor: Time) -> TimeWarp<Self, M> {
        TimeWarp::new(self, modulation, factor)
    }

    /// Locks this signal onto its next crossing of `trigger`.
    fn trigger(
        self,
        trigger: Level,
        rising: bool,
        resolution: Time,
        max_delay: Time,
    ) -> Trigger<Self> {
        Trigger::new(self, trigger, rising, resolution, max_delay)
    }

    /// Multiplies this signal with another (AND-like).
    fn multiply<S: Signal + 'static>(self, other: S) -> Multiply {
        Multiply::new(vec![self.boxed(), Box::new(other)])
    }

    /// Sums this signal with another, unclamped (OR-like).
    fn add<S: Signal + 'static>(self, other: S) -> Add {
        Add::new(vec![self.boxed(), Box::new(other)])
    }

    /// Averages this signal with another, bounded (OR-like).
    fn stack<S: Signal + 'static>(self, other: S) -> Stack {
        Stack::new(vec![self.boxed(), Box::new(other)])
    }
}

impl<T: Signal + 'static> SignalExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{UNIT_LEVEL, UNIT_TIME, as_fraction};

    #[test]
    fn test_chaining_builds_expected_levels() {
        let half: Level = UNIT_LEVEL / 2;
        let signal = half.invert().delay(UNIT_TIME);
        assert_eq!(signal.level(0), -half);
    }

    #[test]
    fn test_multiply_with_unit_keeps_level() {
        let quarter: Level = UNIT_LEVEL / 4;
        let signal = quarter.multiply(UNIT_LEVEL);
        assert!((as_fraction(signal.level(0)) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_stack_averages() {
        let signal = UNIT_LEVEL.stack(0 as Level);
        assert_eq!(signal.level(0), UNIT_LEVEL / 2);
    }
}
