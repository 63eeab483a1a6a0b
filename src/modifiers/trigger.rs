//! Edge-locking modifier.
//!
//! [`Trigger`] is the only signal in the crate that carries mutable state: the
//! delay at which it last found its edge. Evaluation still takes `&self`, the
//! cache living in [`Cell`]s, which keeps the type `Send` but not `Sync`. One
//! instance therefore belongs to one evaluation sequence at a time.

use std::cell::Cell;

use log::{trace, warn};

use crate::signals::{Level, Signal, Time};

/// Brings a signal forward in time so that it crosses `trigger` at time zero.
///
/// On the first evaluation, and again after `trigger`, `rising` or the
/// source change, the source is scanned in `resolution` steps from one step
/// past the current delay up to `max_delay`, then from zero up to the
/// current delay. The first time the source is above `trigger` (rising) or
/// below it (falling) becomes the new delay. When no crossing is found the
/// delay resets to zero.
///
/// Every evaluation returns `source.level(t + delay)`. Because the scan
/// resumes past the last hit, flipping `rising` or nudging `trigger` between
/// evaluations walks along successive edges of the source.
///
/// # Examples
///
/// ```
/// use sigwave::{Adsr, Signal, Trigger, UNIT_LEVEL, UNIT_TIME};
///
/// let env = Adsr::new(UNIT_TIME, UNIT_TIME, UNIT_TIME, UNIT_LEVEL / 2, UNIT_TIME);
/// let locked = Trigger::new(env, UNIT_LEVEL / 4, true, UNIT_TIME / 100, 10 * UNIT_TIME);
/// locked.level(0);
/// assert_eq!(locked.cached_delay(), UNIT_TIME * 26 / 100);
/// ```
#[derive(Debug)]
pub struct Trigger<S: Signal> {
    source: S,
    pub trigger: Level,
    pub rising: bool,
    pub resolution: Time,
    pub max_delay: Time,
    delay: Cell<Time>,
    located: Cell<Option<(Level, bool)>>,
}

impl<S: Signal> Trigger<S> {
    /// Creates a trigger with no cached delay.
    pub fn new(
        source: S,
        trigger: Level,
        rising: bool,
        resolution: Time,
        max_delay: Time,
    ) -> Self {
        Self {
            source,
            trigger,
            rising,
            resolution,
            max_delay,
            delay: Cell::new(0),
            located: Cell::new(None),
        }
    }

    /// Sets the delay the next search resumes from.
    pub fn with_delay(self, delay: Time) -> Self {
        self.delay.set(delay);
        self
    }

    /// Replaces the source, forcing a new search on the next evaluation.
    pub fn set_signal(&mut self, source: S) {
        self.source = source;
        self.located.set(None);
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The delay found by the last search.
    pub fn cached_delay(&self) -> Time {
        self.delay.get()
    }

    fn crossed(&self, t: Time) -> bool {
        let level = self.source.level(t);
        if self.rising {
            level > self.trigger
        } else {
            level < self.trigger
        }
    }

    fn scan(&self, from: Time, until: impl Fn(Time) -> bool) -> Option<Time> {
        let mut t = from;
        while until(t) {
            if self.crossed(t) {
                return Some(t);
            }
            t = t.checked_add(self.resolution)?;
        }
        None
    }

    fn search(&self) -> Time {
        let previous = self.delay.get();
        if self.resolution <= 0 {
            warn!(
                "trigger resolution {} is not positive, skipping search",
                self.resolution
            );
            return 0;
        }
        let forward = previous
            .checked_add(self.resolution)
            .and_then(|from| self.scan(from, |t| t <= self.max_delay));
        forward
            .or_else(|| self.scan(0, |t| t < previous))
            .unwrap_or(0)
    }
}

impl<S: Signal> Signal for Trigger<S> {
    fn level(&self, t: Time) -> Level {
        let wanted = Some((self.trigger, self.rising));
        if self.located.get() != wanted {
            let found = self.search();
            trace!(
                "trigger {} {} relocated from {} to {}",
                self.trigger,
                if self.rising { "rising" } else { "falling" },
                self.delay.get(),
                found
            );
            self.delay.set(found);
            self.located.set(wanted);
        }
        self.source.level(t + self.delay.get())
    }

    fn max_x(&self) -> Option<Time> {
        self.source.max_x()
    }
}
