//! Encoder settings.

use crate::pcm::SampleWidth;
use crate::signals::{Time, UNIT_TIME};

/// Settings for rendering signals into a WAVE stream.
///
/// # Examples
///
/// ```
/// use sigwave::{EncodeConfig, SampleWidth, UNIT_TIME};
///
/// let config = EncodeConfig::default()
///     .with_sample_rate(44_100)
///     .with_sample_width(SampleWidth::Three)
///     .with_length(2 * UNIT_TIME);
/// assert_eq!(config.sample_period(), UNIT_TIME / 44_100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "graph",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EncodeConfig {
    /// Samples per second.
    pub sample_rate: u32,
    /// Bytes per sample.
    pub sample_width: SampleWidth,
    /// Duration to render; the sample at exactly `length` is included.
    pub length: Time,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            sample_width: SampleWidth::Two,
            length: UNIT_TIME,
        }
    }
}

impl EncodeConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_sample_width(mut self, sample_width: SampleWidth) -> Self {
        self.sample_width = sample_width;
        self
    }

    pub fn with_length(mut self, length: Time) -> Self {
        self.length = length;
        self
    }

    /// Time between samples, truncated to whole time units.
    ///
    /// Zero when the sample rate is zero or finer than the time resolution.
    pub fn sample_period(&self) -> Time {
        UNIT_TIME
            .checked_div(self.sample_rate as Time)
            .unwrap_or(0)
    }

    /// Number of samples per channel: every period boundary in `[0, length]`.
    pub fn sample_count(&self) -> u64 {
        let period = self.sample_period();
        if period <= 0 || self.length < 0 {
            return 0;
        }
        (self.length / period) as u64 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EncodeConfig::default();
        assert_eq!(config.sample_rate, 8000);
        assert_eq!(config.sample_width, SampleWidth::Two);
        assert_eq!(config.sample_period(), 125_000);
        assert_eq!(config.sample_count(), 8001);
    }

    #[test]
    fn test_sample_count_includes_endpoint() {
        let config = EncodeConfig::default().with_sample_rate(4).with_length(UNIT_TIME / 2);
        assert_eq!(config.sample_count(), 3);
        assert_eq!(config.with_length(0).sample_count(), 1);
        assert_eq!(config.with_length(-1).sample_count(), 0);
    }

    #[test]
    fn test_zero_rate_has_no_samples() {
        let config = EncodeConfig::default().with_sample_rate(0);
        assert_eq!(config.sample_period(), 0);
        assert_eq!(config.sample_count(), 0);
    }

    #[cfg(feature = "graph")]
    #[test]
    fn test_deserialize_with_defaults() {
        let config: EncodeConfig = serde_json::from_str(r#"{"sample_width": 1}"#).unwrap();
        assert_eq!(config.sample_width, SampleWidth::One);
        assert_eq!(config.sample_rate, 8000);
        assert!(serde_json::from_str::<EncodeConfig>(r#"{"sample_width": 5}"#).is_err());
    }
}
