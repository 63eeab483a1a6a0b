//! Modifiers that warp the time domain of one child signal.

use crate::pcm::Pcm;
use crate::signals::{Level, Signal, Time, UNIT_LEVEL};

fn saturate(t: i128) -> Time {
    t.clamp(Time::MIN as i128, Time::MAX as i128) as Time
}

/// Shifts a signal later in time.
///
/// A delayed PCM buffer is still recognised by the encoder, which copies
/// its bytes and pads the gap with silence.
///
/// # Examples
///
/// ```
/// use sigwave::{Delay, Signal, Step, UNIT_TIME, UNIT_LEVEL};
///
/// let late = Delay::new(Step, UNIT_TIME);
/// assert_eq!(late.level(UNIT_TIME - 1), 0);
/// assert_eq!(late.level(UNIT_TIME), UNIT_LEVEL);
/// ```
#[derive(Debug, Clone)]
pub struct Delay<S: Signal> {
    pub source: S,
    pub delay: Time,
}

impl<S: Signal> Delay<S> {
    /// Creates a new delay.
    pub fn new(source: S, delay: Time) -> Self {
        Self { source, delay }
    }
}

impl<S: Signal> Signal for Delay<S> {
    fn level(&self, t: Time) -> Level {
        self.source.level(t - self.delay)
    }

    fn max_x(&self) -> Option<Time> {
        self.source.max_x().map(|x| x + self.delay)
    }

    fn period(&self) -> Option<Time> {
        self.source.period()
    }

    fn pcm_source(&self) -> Option<(&Pcm, Time)> {
        self.source
            .pcm_source()
            .map(|(pcm, start)| (pcm, start + self.delay))
    }
}

/// Runs a signal's time `factor` times faster. Fractional factors slow it down.
#[derive(Debug, Clone)]
pub struct SpeedUp<S: Signal> {
    pub source: S,
    pub factor: f64,
}

impl<S: Signal> SpeedUp<S> {
    /// Creates a new speed-up.
    pub fn new(source: S, factor: f64) -> Self {
        Self { source, factor }
    }
}

impl<S: Signal> Signal for SpeedUp<S> {
    fn level(&self, t: Time) -> Level {
        self.source.level((t as f64 * self.factor) as Time)
    }
}

/// Quadratically accelerating time, `t + t²/rate`.
///
/// Gives a rising chirp from any periodic source. A zero `rate` leaves time
/// unchanged.
#[derive(Debug, Clone)]
pub struct ProgressiveSpeedUp<S: Signal> {
    pub source: S,
    pub rate: Time,
}

impl<S: Signal> ProgressiveSpeedUp<S> {
    /// Creates a new progressive speed-up.
    pub fn new(source: S, rate: Time) -> Self {
        Self { source, rate }
    }
}

impl<S: Signal> Signal for ProgressiveSpeedUp<S> {
    fn level(&self, t: Time) -> Level {
        let t = t as i128;
        let ahead = (t * t).checked_div(self.rate as i128).unwrap_or(0);
        self.source.level(saturate(t + ahead))
    }
}

/// Repeats the first `length` of a signal forever.
///
/// A zero `length` holds the level the source has at time zero.
#[derive(Debug, Clone)]
pub struct Loop<S: Signal> {
    pub source: S,
    pub length: Time,
}

impl<S: Signal> Loop<S> {
    /// Creates a new loop.
    pub fn new(source: S, length: Time) -> Self {
        Self { source, length }
    }
}

impl<S: Signal> Signal for Loop<S> {
    fn level(&self, t: Time) -> Level {
        self.source
            .level(t.checked_rem_euclid(self.length).unwrap_or(0))
    }

    fn period(&self) -> Option<Time> {
        Some(self.length)
    }
}

/// Runs a signal's time backwards about zero.
#[derive(Debug, Clone)]
pub struct Reverse<S: Signal> {
    pub source: S,
}

impl<S: Signal> Reverse<S> {
    /// Creates a new reversal.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: Signal> Signal for Reverse<S> {
    fn level(&self, t: Time) -> Level {
        self.source.level(t.saturating_neg())
    }

    fn period(&self) -> Option<Time> {
        self.source.period()
    }
}

/// Stretches a signal's time in proportion to a modulating signal.
///
/// At full-scale modulation the source is read `factor` ahead of `t`; at
/// negative full scale, `factor` behind. Sine modulation of a tone gives
/// vibrato.
#[derive(Debug, Clone)]
pub struct TimeWarp<S: Signal, M: Signal> {
    pub source: S,
    pub modulation: M,
    pub factor: Time,
}

impl<S: Signal, M: Signal> TimeWarp<S, M> {
    /// Creates a new time warp.
    pub fn new(source: S, modulation: M, factor: Time) -> Self {
        Self {
            source,
            modulation,
            factor,
        }
    }
}

impl<S: Signal, M: Signal> Signal for TimeWarp<S, M> {
    fn level(&self, t: Time) -> Level {
        let shift =
            self.modulation.level(t) as i128 * self.factor as i128 / UNIT_LEVEL as i128;
        self.source.level(saturate(t as i128 + shift))
    }

    fn max_x(&self) -> Option<Time> {
        self.source.max_x()
    }
}
