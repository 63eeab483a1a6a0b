//! Sample widths and the quantisation between levels and sample bytes.

use crate::error::{Error, Result};
use crate::signals::{LEVEL_BITS, Level};

/// Bytes per sample supported by the codec.
///
/// Beyond the conventional 8 and 16 bit formats, 24, 32, 48 and 64 bit
/// samples are carried too, so a full 64-bit level can survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "graph",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum SampleWidth {
    /// Unsigned 8-bit, offset by 128.
    One,
    /// Signed 16-bit.
    Two,
    /// Signed 24-bit.
    Three,
    /// Signed 32-bit.
    Four,
    /// Signed 48-bit.
    Six,
    /// Signed 64-bit.
    Eight,
}

impl SampleWidth {
    /// All supported widths, narrowest first.
    pub const ALL: [SampleWidth; 6] = [
        SampleWidth::One,
        SampleWidth::Two,
        SampleWidth::Three,
        SampleWidth::Four,
        SampleWidth::Six,
        SampleWidth::Eight,
    ];

    /// Width in bytes.
    pub fn bytes(self) -> usize {
        match self {
            SampleWidth::One => 1,
            SampleWidth::Two => 2,
            SampleWidth::Three => 3,
            SampleWidth::Four => 4,
            SampleWidth::Six => 6,
            SampleWidth::Eight => 8,
        }
    }

    /// Width in bits, as stored in a `"fmt "` chunk.
    pub fn bits(self) -> u16 {
        self.bytes() as u16 * 8
    }

    /// Width for a `"fmt "` chunk's bits-per-sample field.
    pub fn from_bits(bits: u16) -> Result<Self> {
        if bits % 8 != 0 {
            return Err(Error::UnsupportedSampleWidth(bits));
        }
        Self::from_bytes(bits / 8)
    }

    /// Width for a byte count.
    pub fn from_bytes(bytes: u16) -> Result<Self> {
        match bytes {
            1 => Ok(SampleWidth::One),
            2 => Ok(SampleWidth::Two),
            3 => Ok(SampleWidth::Three),
            4 => Ok(SampleWidth::Four),
            6 => Ok(SampleWidth::Six),
            8 => Ok(SampleWidth::Eight),
            other => Err(Error::UnsupportedSampleWidth(other)),
        }
    }

    fn shift(self) -> u32 {
        LEVEL_BITS - 8 * self.bytes() as u32
    }

    /// Level of one little-endian sample. `bytes` must hold exactly one sample.
    pub fn decode(self, bytes: &[u8]) -> Level {
        if self == SampleWidth::One {
            return (bytes[0] as Level - 128) << self.shift();
        }
        let raw = bytes
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | (*b as u64) << (8 * i));
        (raw << self.shift()) as Level
    }

    /// Quantises `level` into `out`, which must hold exactly one sample.
    pub fn encode(self, level: Level, out: &mut [u8]) {
        let sample = level >> self.shift();
        if self == SampleWidth::One {
            out[0] = (sample + 128) as u8;
            return;
        }
        let bytes = sample.to_le_bytes();
        out.copy_from_slice(&bytes[..self.bytes()]);
    }

    /// Encoding of level zero, repeated `count` times.
    pub fn silence(self, count: usize) -> Vec<u8> {
        let mut sample = [0u8; 8];
        self.encode(0, &mut sample[..self.bytes()]);
        sample[..self.bytes()].repeat(count)
    }
}

impl TryFrom<u8> for SampleWidth {
    type Error = Error;

    fn try_from(bytes: u8) -> Result<Self> {
        Self::from_bytes(bytes as u16)
    }
}

impl From<SampleWidth> for u8 {
    fn from(width: SampleWidth) -> u8 {
        width.bytes() as u8
    }
}
