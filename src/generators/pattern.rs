//! Pulses following a caller-supplied bit sequence.

use crate::signals::{Level, Signal, Time, UNIT_LEVEL};

/// Full scale or zero according to successive bits, one bit per `unit`.
///
/// Bits are read least-significant first from a little-endian byte
/// sequence, so `0b0111` plays as on, on, on, off. Before time zero and
/// past the last bit the level is zero.
///
/// # Examples
///
/// ```
/// use sigwave::{PulsePattern, Signal, UNIT_TIME, UNIT_LEVEL};
///
/// let morse = PulsePattern::from_binary("0111", UNIT_TIME).unwrap();
/// assert_eq!(morse.level(0), UNIT_LEVEL);
/// assert_eq!(morse.level(3 * UNIT_TIME), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulsePattern {
    bits: Vec<u8>,
    unit: Time,
}

impl PulsePattern {
    /// Creates a pattern from little-endian bytes. `unit` is at least one
    /// time unit.
    pub fn new(bits: Vec<u8>, unit: Time) -> Self {
        Self {
            bits,
            unit: unit.max(1),
        }
    }

    /// Creates a 64-bit pattern from an integer.
    pub fn from_u64(bits: u64, unit: Time) -> Self {
        Self::new(bits.to_le_bytes().to_vec(), unit)
    }

    /// Parses binary digits written most-significant first, as a number is.
    ///
    /// Returns `None` when the text holds anything other than `0` and `1`.
    pub fn from_binary(digits: &str, unit: Time) -> Option<Self> {
        let mut bits = vec![0u8; digits.len().div_ceil(8)];
        for (i, c) in digits.chars().rev().enumerate() {
            match c {
                '0' => {}
                '1' => bits[i / 8] |= 1 << (i % 8),
                _ => return None,
            }
        }
        Some(Self::new(bits, unit))
    }

    /// The bit bytes, least significant first.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Duration of one bit.
    pub fn unit(&self) -> Time {
        self.unit
    }

    fn bit(&self, index: usize) -> bool {
        self.bits
            .get(index / 8)
            .is_some_and(|&byte| byte >> (index % 8) & 1 == 1)
    }
}

impl Signal for PulsePattern {
    fn level(&self, t: Time) -> Level {
        if t < 0 {
            return 0;
        }
        if self.bit((t / self.unit) as usize) {
            UNIT_LEVEL
        } else {
            0
        }
    }

    fn max_x(&self) -> Option<Time> {
        Some(self.bits.len() as Time * 8 * self.unit)
    }
}
