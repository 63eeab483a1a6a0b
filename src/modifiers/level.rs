//! Modifiers that transform the level of one child signal.

use crate::signals::{Level, Signal, Time, UNIT_LEVEL};

/// Negates a signal.
///
/// # Examples
///
/// ```
/// use sigwave::{Invert, Signal, Step, UNIT_LEVEL};
///
/// assert_eq!(Invert::new(Step).level(0), -UNIT_LEVEL);
/// ```
#[derive(Debug, Clone)]
pub struct Invert<S: Signal> {
    pub source: S,
}

impl<S: Signal> Invert<S> {
    /// Creates a new inversion.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: Signal> Signal for Invert<S> {
    fn level(&self, t: Time) -> Level {
        self.source.level(t).saturating_neg()
    }

    fn max_x(&self) -> Option<Time> {
        self.source.max_x()
    }

    fn period(&self) -> Option<Time> {
        self.source.period()
    }
}

/// Folds a signal's level around full scale.
///
/// Positive levels map to `UNIT_LEVEL - v` and negative ones to
/// `-UNIT_LEVEL - v`, so a rising envelope becomes a falling one of the same
/// sign.
#[derive(Debug, Clone)]
pub struct Reflect<S: Signal> {
    pub source: S,
}

impl<S: Signal> Reflect<S> {
    /// Creates a new reflection.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: Signal> Signal for Reflect<S> {
    fn level(&self, t: Time) -> Level {
        match self.source.level(t) {
            v if v < 0 => -UNIT_LEVEL - v,
            v => UNIT_LEVEL - v,
        }
    }

    fn max_x(&self) -> Option<Time> {
        self.source.max_x()
    }

    fn period(&self) -> Option<Time> {
        self.source.period()
    }
}
