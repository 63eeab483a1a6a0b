//! Fixed-point numeric model and the core `Signal` trait.
//!
//! Time and level are both plain signed 64-bit integers. `UNIT_TIME` is one
//! period (think "one second") and `UNIT_LEVEL` is full scale; every level
//! operation in the crate keeps values in the same fixed-point scale.

use crate::pcm::Pcm;

/// Offset along a signal's domain. The origin is arbitrary.
pub type Time = i64;

/// Amplitude of a signal, within `[-UNIT_LEVEL, UNIT_LEVEL]`.
pub type Level = i64;

/// One period of time.
pub const UNIT_TIME: Time = 1_000_000_000;

/// Bit width of [`Level`].
pub const LEVEL_BITS: u32 = Level::BITS;

/// Half of [`LEVEL_BITS`], used by the fixed-point product.
pub const HALF_LEVEL_BITS: u32 = LEVEL_BITS / 2;

/// Full-scale amplitude (100%).
pub const UNIT_LEVEL: Level = Level::MAX;

/// Converts a (possibly fractional) number of periods to [`Time`].
///
/// # Examples
///
/// ```
/// use sigwave::{units, UNIT_TIME};
///
/// assert_eq!(units(1.5), UNIT_TIME + UNIT_TIME / 2);
/// ```
pub fn units(periods: f64) -> Time {
    (periods * UNIT_TIME as f64) as Time
}

/// Length of one cycle at `frequency` cycles per unit time.
pub fn period_for(frequency: f64) -> Time {
    (UNIT_TIME as f64 / frequency) as Time
}

/// Converts a fraction of full scale (`1.0` = 100%) to a [`Level`].
///
/// Values beyond ±1.0 saturate.
pub fn fraction(value: f64) -> Level {
    (value * UNIT_LEVEL as f64) as Level
}

/// Converts a [`Level`] to a fraction of full scale.
pub fn as_fraction(level: Level) -> f64 {
    level as f64 / UNIT_LEVEL as f64
}

/// A time-varying amplitude: a pure mapping from [`Time`] to [`Level`].
///
/// The optional capabilities are answered through default methods, so a
/// plain signal implements only [`level`](Signal::level):
///
/// - [`max_x`](Signal::max_x): exclusive end of a finite domain,
/// - [`period`](Signal::period): repeat length of a periodic signal,
/// - [`pcm_source`](Signal::pcm_source): the sampled buffer backing the
///   signal, used by the encoder to copy bytes instead of re-evaluating.
///
/// Signals are `Send` so each channel can be rendered on its own thread.
///
/// # Examples
///
/// ```
/// use sigwave::{Signal, Sine, UNIT_TIME};
///
/// let tone = Sine::new(UNIT_TIME);
/// assert_eq!(tone.level(0), 0);
/// assert_eq!(tone.period(), Some(UNIT_TIME));
/// ```
pub trait Signal: Send {
    /// Level of the signal at time `t`.
    fn level(&self, t: Time) -> Level;

    /// Exclusive end of the signal's domain, `None` when unbounded.
    fn max_x(&self) -> Option<Time> {
        None
    }

    /// Repeat length, `None` when the signal is not periodic.
    fn period(&self) -> Option<Time> {
        None
    }

    /// PCM buffer backing this signal and the time its first sample sits at.
    ///
    /// When this returns `Some((pcm, start))`, `self.level(t)` must equal
    /// `pcm.level(t - start)` for every `t`.
    fn pcm_source(&self) -> Option<(&Pcm, Time)> {
        None
    }
}

impl<S: Signal + ?Sized> Signal for Box<S> {
    fn level(&self, t: Time) -> Level {
        (**self).level(t)
    }

    fn max_x(&self) -> Option<Time> {
        (**self).max_x()
    }

    fn period(&self) -> Option<Time> {
        (**self).period()
    }

    fn pcm_source(&self) -> Option<(&Pcm, Time)> {
        (**self).pcm_source()
    }
}

/// A bare [`Level`] is a constant signal.
///
/// ```
/// use sigwave::{Signal, UNIT_LEVEL};
///
/// assert_eq!(UNIT_LEVEL.level(12345), UNIT_LEVEL);
/// ```
impl Signal for Level {
    fn level(&self, _t: Time) -> Level {
        *self
    }
}
