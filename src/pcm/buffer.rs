//! Finite signal backed by raw PCM sample bytes.

use std::fmt;
use std::sync::Arc;

use super::SampleWidth;
use crate::signals::{Level, Signal, Time};

/// A signal whose levels come from a sampled buffer at a fixed period.
///
/// Sample `i` covers `[i * sample_period, (i + 1) * sample_period)`. Queries
/// outside the buffer return zero rather than failing. The bytes are kept in
/// the exact layout a PCM data chunk uses, so the encoder can copy them
/// without touching individual samples.
///
/// Cloning is cheap: the bytes are shared.
///
/// # Examples
///
/// ```
/// use sigwave::{Pcm, SampleWidth, Signal, UNIT_TIME};
///
/// let pcm = Pcm::new(UNIT_TIME / 4, SampleWidth::Two, vec![0x00, 0x40, 0x00, 0xc0]);
/// assert_eq!(pcm.samples(), 2);
/// assert_eq!(pcm.max_x(), Some(UNIT_TIME / 2));
/// assert!(pcm.level(0) > 0);
/// assert!(pcm.level(UNIT_TIME / 4) < 0);
/// assert_eq!(pcm.level(UNIT_TIME), 0);
/// ```
#[derive(Clone)]
pub struct Pcm {
    sample_period: Time,
    width: SampleWidth,
    data: Arc<[u8]>,
}

impl Pcm {
    /// Wraps raw sample bytes. A trailing partial sample is ignored.
    pub fn new(sample_period: Time, width: SampleWidth, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            sample_period,
            width,
            data: data.into(),
        }
    }

    /// Samples `signal` `count` times, one sample period apart from time zero.
    pub fn render(signal: &dyn Signal, sample_period: Time, width: SampleWidth, count: usize) -> Self {
        let mut data = vec![0u8; count * width.bytes()];
        for (i, out) in data.chunks_exact_mut(width.bytes()).enumerate() {
            width.encode(signal.level(i as Time * sample_period), out);
        }
        Self::new(sample_period, width, data)
    }

    /// Time between samples.
    pub fn sample_period(&self) -> Time {
        self.sample_period
    }

    /// Bytes per sample.
    pub fn width(&self) -> SampleWidth {
        self.width
    }

    /// Raw sample bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of whole samples in the buffer.
    pub fn samples(&self) -> usize {
        self.data.len() / self.width.bytes()
    }

    /// Level of sample `index`, zero when out of range.
    pub fn sample(&self, index: i64) -> Level {
        let Ok(index) = usize::try_from(index) else {
            return 0;
        };
        if index >= self.samples() {
            return 0;
        }
        let size = self.width.bytes();
        self.width.decode(&self.data[index * size..(index + 1) * size])
    }
}

impl Signal for Pcm {
    fn level(&self, t: Time) -> Level {
        self.sample(t.div_euclid(self.sample_period))
    }

    fn max_x(&self) -> Option<Time> {
        Some(self.sample_period * self.samples() as Time)
    }

    fn pcm_source(&self) -> Option<(&Pcm, Time)> {
        Some((self, 0))
    }
}

impl fmt::Debug for Pcm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pcm")
            .field("sample_period", &self.sample_period)
            .field("width", &self.width)
            .field("samples", &self.samples())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Square;
    use crate::signals::{UNIT_LEVEL, UNIT_TIME};

    #[test]
    fn test_floor_indexing() {
        let pcm = Pcm::new(10, SampleWidth::One, vec![128, 255, 0]);
        assert_eq!(pcm.level(0), 0);
        assert_eq!(pcm.level(9), 0);
        assert!(pcm.level(10) > 0);
        assert!(pcm.level(19) > 0);
        assert!(pcm.level(20) < 0);
        assert!(pcm.level(29) < 0);
    }

    #[test]
    fn test_out_of_range_is_zero() {
        let pcm = Pcm::new(10, SampleWidth::One, vec![255, 255]);
        assert_eq!(pcm.level(-1), 0);
        assert_eq!(pcm.level(-10), 0);
        assert_eq!(pcm.level(20), 0);
        assert_eq!(pcm.level(Time::MAX), 0);
    }

    #[test]
    fn test_max_x() {
        for width in SampleWidth::ALL {
            let pcm = Pcm::new(7, width, vec![0u8; width.bytes() * 5]);
            assert_eq!(pcm.samples(), 5);
            assert_eq!(pcm.max_x(), Some(35));
        }
    }

    #[test]
    fn test_partial_trailing_sample_ignored() {
        let pcm = Pcm::new(1, SampleWidth::Three, vec![0u8; 7]);
        assert_eq!(pcm.samples(), 2);
    }

    #[test]
    fn test_render_square() {
        let period = UNIT_TIME / 8;
        let pcm = Pcm::render(&Square::new(UNIT_TIME), period, SampleWidth::Eight, 8);
        assert_eq!(pcm.samples(), 8);
        for i in 0..4 {
            assert_eq!(pcm.sample(i), UNIT_LEVEL);
        }
        for i in 4..8 {
            assert_eq!(pcm.sample(i), -UNIT_LEVEL);
        }
    }

    #[test]
    fn test_pcm_source_is_self() {
        let pcm = Pcm::new(3, SampleWidth::Two, vec![1, 2]);
        let (source, start) = pcm.pcm_source().unwrap();
        assert_eq!(start, 0);
        assert_eq!(source.data(), pcm.data());
    }
}
