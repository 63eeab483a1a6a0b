//! Signal combinators for merging an ordered sequence of child signals.
//!
//! All three combinators own their children as boxed trait objects. Child
//! order matters only for [`Signal::period`], which is taken from the first
//! child alone; callers that care about periodicity must put a representative
//! child first.

use crate::signals::{HALF_LEVEL_BITS, Level, Signal, Time, UNIT_LEVEL};

/// Scale-preserving fixed-point product of two levels.
///
/// Both operands drop their low half before multiplying so the intermediate
/// cannot overflow; the doubling restores the scale and saturates, which only
/// matters for `(-UNIT_LEVEL) * (-UNIT_LEVEL)`.
pub fn multiply_levels(a: Level, b: Level) -> Level {
    ((a >> HALF_LEVEL_BITS) * (b >> HALF_LEVEL_BITS)).saturating_mul(2)
}

fn first_period(children: &[Box<dyn Signal>]) -> Option<Time> {
    children.first().and_then(|s| s.period())
}

fn shortest_bound(children: &[Box<dyn Signal>]) -> Option<Time> {
    children.iter().filter_map(|s| s.max_x()).min()
}

fn longest_bound(children: &[Box<dyn Signal>]) -> Option<Time> {
    children.iter().filter_map(|s| s.max_x()).max()
}

/// Multiplies signals together (AND-like).
///
/// Full-scale children are skipped, so the result is full scale
/// only when every child is, and zero as soon as any child is zero. The
/// domain ends where the shortest bounded child ends.
///
/// # Examples
///
/// ```
/// use sigwave::{Multiply, Signal, Sine, Pulse, UNIT_TIME};
///
/// let burst = Multiply::new(vec![
///     Box::new(Sine::new(UNIT_TIME / 10)),
///     Box::new(Pulse::new(UNIT_TIME)),
/// ]);
/// assert_eq!(burst.max_x(), Some(UNIT_TIME));
/// ```
#[derive(Default)]
pub struct Multiply {
    children: Vec<Box<dyn Signal>>,
}

impl Multiply {
    /// Creates a new Multiply combinator.
    pub fn new(children: Vec<Box<dyn Signal>>) -> Self {
        Self { children }
    }

    /// Appends another factor.
    pub fn push(&mut self, child: impl Signal + 'static) {
        self.children.push(Box::new(child));
    }

    /// The factors, in order.
    pub fn children(&self) -> &[Box<dyn Signal>] {
        &self.children
    }
}

impl Signal for Multiply {
    fn level(&self, t: Time) -> Level {
        let mut total = UNIT_LEVEL;
        for child in &self.children {
            match child.level(t) {
                0 => return 0,
                UNIT_LEVEL => continue,
                l => total = multiply_levels(total, l),
            }
        }
        total
    }

    fn max_x(&self) -> Option<Time> {
        shortest_bound(&self.children)
    }

    fn period(&self) -> Option<Time> {
        first_period(&self.children)
    }
}

impl FromIterator<Box<dyn Signal>> for Multiply {
    fn from_iter<I: IntoIterator<Item = Box<dyn Signal>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Adds signals together (OR-like).
///
/// The sum is not bounded: mixing full-scale children can run past
/// `UNIT_LEVEL` and wraps. Use [`Stack`] when the result must stay in range.
/// The domain ends where the longest bounded child ends; absent terms
/// contribute zero.
pub struct Add {
    children: Vec<Box<dyn Signal>>,
}

impl Add {
    /// Creates a new Add combinator.
    pub fn new(children: Vec<Box<dyn Signal>>) -> Self {
        Self { children }
    }

    /// Appends another term.
    pub fn push(&mut self, child: impl Signal + 'static) {
        self.children.push(Box::new(child));
    }

    /// The terms, in order.
    pub fn children(&self) -> &[Box<dyn Signal>] {
        &self.children
    }
}

impl Signal for Add {
    fn level(&self, t: Time) -> Level {
        self.children
            .iter()
            .fold(0, |total: Level, s| total.wrapping_add(s.level(t)))
    }

    fn max_x(&self) -> Option<Time> {
        longest_bound(&self.children)
    }

    fn period(&self) -> Option<Time> {
        first_period(&self.children)
    }
}

impl FromIterator<Box<dyn Signal>> for Add {
    fn from_iter<I: IntoIterator<Item = Box<dyn Signal>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Adds signals together scaled down by their count (bounded OR-like).
///
/// Each child's level is divided by the number of children before summing,
/// so the result stays within `[-UNIT_LEVEL, UNIT_LEVEL]` whenever every
/// child does.
pub struct Stack {
    children: Vec<Box<dyn Signal>>,
}

impl Stack {
    /// Creates a new Stack combinator.
    pub fn new(children: Vec<Box<dyn Signal>>) -> Self {
        Self { children }
    }

    /// Appends another layer.
    pub fn push(&mut self, child: impl Signal + 'static) {
        self.children.push(Box::new(child));
    }

    /// The layers, in order.
    pub fn children(&self) -> &[Box<dyn Signal>] {
        &self.children
    }
}

impl Signal for Stack {
    fn level(&self, t: Time) -> Level {
        let count = self.children.len() as Level;
        self.children.iter().map(|s| s.level(t) / count).sum()
    }

    fn max_x(&self) -> Option<Time> {
        longest_bound(&self.children)
    }

    fn period(&self) -> Option<Time> {
        first_period(&self.children)
    }
}

impl FromIterator<Box<dyn Signal>> for Stack {
    fn from_iter<I: IntoIterator<Item = Box<dyn Signal>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Adsr, Pulse, Sine};
    use crate::signals::{UNIT_TIME, as_fraction};

    fn constant(l: Level) -> Box<dyn Signal> {
        Box::new(l)
    }

    #[test]
    fn test_multiply_all_unit_is_unit() {
        for n in 1..6 {
            let m: Multiply = (0..n).map(|_| constant(UNIT_LEVEL)).collect();
            assert_eq!(m.level(0), UNIT_LEVEL);
        }
    }

    #[test]
    fn test_multiply_any_zero_is_zero() {
        let m = Multiply::new(vec![
            constant(UNIT_LEVEL / 3),
            constant(0),
            constant(-UNIT_LEVEL),
        ]);
        assert_eq!(m.level(0), 0);
    }

    #[test]
    fn test_multiply_halves() {
        let m = Multiply::new(vec![constant(UNIT_LEVEL / 2), constant(UNIT_LEVEL / 2)]);
        assert!((as_fraction(m.level(0)) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_multiply_negative_extremes_do_not_overflow() {
        assert_eq!(multiply_levels(-UNIT_LEVEL, -UNIT_LEVEL), UNIT_LEVEL);
        let m = Multiply::new(vec![constant(-UNIT_LEVEL), constant(-UNIT_LEVEL / 2)]);
        assert!((as_fraction(m.level(0)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_multiply_order_independent() {
        let a = UNIT_LEVEL / 3;
        let b = -UNIT_LEVEL / 5;
        let c = UNIT_LEVEL / 7 * 6;
        let m1 = Multiply::new(vec![constant(a), constant(b), constant(c)]);
        let m2 = Multiply::new(vec![constant(c), constant(a), constant(b)]);
        assert!((as_fraction(m1.level(0)) - as_fraction(m2.level(0))).abs() < 1e-6);
    }

    #[test]
    fn test_multiply_sines() {
        let m = Multiply::new(vec![
            Box::new(Sine::new(UNIT_TIME * 5)),
            Box::new(Sine::new(UNIT_TIME * 10)),
        ]);
        // sin(2π·0.02)·sin(2π·0.01)
        assert!((as_fraction(m.level(UNIT_TIME / 10)) - 0.0079).abs() < 1e-4);
        // sin(2π·0.3)·sin(2π·0.15)
        assert!((as_fraction(m.level(UNIT_TIME * 3 / 2)) - 0.7694).abs() < 1e-4);
    }

    #[test]
    fn test_multiply_max_x_is_shortest() {
        let m = Multiply::new(vec![
            Box::new(Sine::new(UNIT_TIME)),
            Box::new(Pulse::new(UNIT_TIME * 3)),
            Box::new(Pulse::new(UNIT_TIME * 2)),
        ]);
        assert_eq!(m.max_x(), Some(UNIT_TIME * 2));

        let unbounded = Multiply::new(vec![Box::new(Sine::new(UNIT_TIME))]);
        assert_eq!(unbounded.max_x(), None);
    }

    #[test]
    fn test_add_and_stack_max_x_is_longest() {
        let children = || -> Vec<Box<dyn Signal>> {
            vec![
                Box::new(Pulse::new(UNIT_TIME)),
                Box::new(Sine::new(UNIT_TIME)),
                Box::new(Adsr::new(UNIT_TIME, UNIT_TIME, UNIT_TIME, UNIT_LEVEL / 2, UNIT_TIME)),
            ]
        };
        assert_eq!(Add::new(children()).max_x(), Some(UNIT_TIME * 4));
        assert_eq!(Stack::new(children()).max_x(), Some(UNIT_TIME * 4));
    }

    #[test]
    fn test_period_from_first_child_only() {
        let m = Multiply::new(vec![
            Box::new(Sine::new(UNIT_TIME * 5)),
            Box::new(Sine::new(UNIT_TIME * 10)),
        ]);
        assert_eq!(m.period(), Some(UNIT_TIME * 5));

        let a = Add::new(vec![Box::new(Pulse::new(UNIT_TIME)), Box::new(Sine::new(UNIT_TIME))]);
        assert_eq!(a.period(), None);
    }

    #[test]
    fn test_add_is_unclamped_sum() {
        let a = Add::new(vec![constant(UNIT_LEVEL / 4), constant(UNIT_LEVEL / 4), constant(-5)]);
        assert_eq!(a.level(0), UNIT_LEVEL / 4 * 2 - 5);
    }

    #[test]
    fn test_stack_stays_in_range() {
        for n in 1..8 {
            let full: Stack = (0..n).map(|_| constant(UNIT_LEVEL)).collect();
            assert!(full.level(0) <= UNIT_LEVEL);
            let empty_floor: Stack = (0..n).map(|_| constant(-UNIT_LEVEL)).collect();
            assert!(empty_floor.level(0) >= -UNIT_LEVEL);
        }
    }

    #[test]
    fn test_stack_sines() {
        let s = Stack::new(vec![
            Box::new(Sine::new(UNIT_TIME * 5)),
            Box::new(Sine::new(UNIT_TIME * 10)),
        ]);
        // (sin(2π·0.3) + sin(2π·0.15)) / 2
        assert!((as_fraction(s.level(UNIT_TIME * 3 / 2)) - 0.8800).abs() < 1e-4);
    }

    #[test]
    fn test_single_factor_goes_through_product() {
        let half = UNIT_LEVEL / 2;
        let m = Multiply::new(vec![constant(half)]);
        assert_eq!(m.level(0), multiply_levels(UNIT_LEVEL, half));
        assert_eq!(m.level(0), 4_611_686_011_984_936_962);

        let pair = Multiply::new(vec![constant(half), constant(UNIT_LEVEL / 3)]);
        let expected = multiply_levels(multiply_levels(UNIT_LEVEL, half), UNIT_LEVEL / 3);
        assert_eq!(pair.level(0), expected);
        assert_eq!(pair.level(0), 1_537_228_668_514_162_008);
    }

    #[test]
    fn test_push_appends() {
        let mut m = Multiply::default();
        m.push(UNIT_LEVEL / 2);
        m.push(0 as Level);
        assert_eq!(m.children().len(), 2);
        assert_eq!(m.level(0), 0);
    }
}
