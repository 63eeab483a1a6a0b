//! Parsing a WAVE stream into one PCM signal per channel.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use log::debug;

use super::format::{ChunkSource, Seekable, Sequential, read_header};
use crate::error::{Error, Result, STREAM_ORIGIN};
use crate::pcm::Pcm;

/// Bytes reserved up front across all channels, whatever the header claims.
const INITIAL_BYTES: usize = 1 << 20;

/// Decodes a WAVE stream, skipping unwanted chunks by reading past them.
///
/// # Examples
///
/// ```
/// use sigwave::{EncodeConfig, SignalExt, UNIT_LEVEL, wav};
///
/// let bytes = wav::encode_to_vec(vec![UNIT_LEVEL.boxed()], &EncodeConfig::default()).unwrap();
/// let channels = wav::decode(bytes.as_slice()).unwrap();
/// assert_eq!(channels.len(), 1);
/// assert_eq!(channels[0].samples(), 8001);
/// ```
pub fn decode<R: Read>(reader: R) -> Result<Vec<Pcm>> {
    decode_from(&mut Sequential(reader), STREAM_ORIGIN)
}

/// Decodes a WAVE stream, skipping unwanted chunks by seeking.
pub fn decode_seekable<R: Read + Seek>(reader: R) -> Result<Vec<Pcm>> {
    decode_from(&mut Seekable(reader), STREAM_ORIGIN)
}

/// Decodes a WAVE file. Errors name the file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Vec<Pcm>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    decode_from(
        &mut Seekable(BufReader::new(file)),
        &path.display().to_string(),
    )
}

fn decode_from<S: ChunkSource>(source: &mut S, origin: &str) -> Result<Vec<Pcm>> {
    let (format, data_len) = read_header(source, origin)?;
    let channels = format.channels as usize;
    let size = format.width.bytes();
    let data_len = data_len as usize;
    if data_len % channels != 0 {
        return Err(Error::unsupported(
            format!(
                "{} bytes of sample data not divisible by {} channels",
                data_len, channels
            ),
            origin,
        ));
    }
    let samples = data_len / channels / size;
    debug!(
        "decoding {} channels of {} samples, {} bytes each, from {}",
        channels, samples, size, origin
    );

    let reserve = (samples * size).min(INITIAL_BYTES / channels);
    let mut regions: Vec<Vec<u8>> = (0..channels)
        .map(|_| Vec::with_capacity(reserve))
        .collect();
    let mut frame = vec![0u8; channels * size];
    for index in 0..samples {
        source.read_exact(&mut frame).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::short_read(
                format!("read incomplete at sample {} of {}", index, samples),
                origin,
            ),
            _ => Error::Io(e),
        })?;
        for (region, sample) in regions.iter_mut().zip(frame.chunks_exact(size)) {
            region.extend_from_slice(sample);
        }
    }

    let period = format.sample_period();
    Ok(regions
        .into_iter()
        .map(|region| Pcm::new(period, format.width, region))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::SampleWidth;
    use crate::wav::format::WavFormat;
    use std::io::Cursor;

    fn wav(format: WavFormat, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        format.write_header(&mut out, data.len() as u32).unwrap();
        out.extend_from_slice(data);
        out
    }

    fn stereo8() -> WavFormat {
        WavFormat {
            channels: 2,
            sample_rate: 1000,
            width: SampleWidth::One,
        }
    }

    #[test]
    fn test_deinterleaves() {
        let bytes = wav(stereo8(), &[1, 2, 3, 4, 5, 6]);
        let channels = decode(bytes.as_slice()).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].data(), [1, 3, 5]);
        assert_eq!(channels[1].data(), [2, 4, 6]);
        assert_eq!(channels[0].sample_period(), 1_000_000);
        assert_eq!(channels[1].width(), SampleWidth::One);
    }

    #[test]
    fn test_seekable_matches_sequential() {
        let bytes = wav(stereo8(), &[9, 8, 7, 6]);
        let a = decode(bytes.as_slice()).unwrap();
        let b = decode_seekable(Cursor::new(bytes)).unwrap();
        for (a, b) in a.iter().zip(&b) {
            assert_eq!(a.data(), b.data());
        }
    }

    #[test]
    fn test_odd_data_length_for_channels() {
        let bytes = wav(stereo8(), &[1, 2, 3]);
        assert!(matches!(
            decode(bytes.as_slice()),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_short_data_chunk() {
        let mut bytes = wav(stereo8(), &[1, 2, 3, 4, 5, 6]);
        bytes.truncate(bytes.len() - 1);
        let err = decode(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, Error::ShortRead { ref origin, .. } if origin == STREAM_ORIGIN));
    }

    fn with_channels(channels: u16, bits: u16, data_len: u32) -> Vec<u8> {
        let mut bytes = wav(stereo8(), &[]);
        bytes[22..24].copy_from_slice(&channels.to_le_bytes());
        bytes[34..36].copy_from_slice(&bits.to_le_bytes());
        bytes[40..44].copy_from_slice(&data_len.to_le_bytes());
        bytes
    }

    #[test]
    fn test_rejects_excessive_channel_count() {
        let bytes = with_channels(u16::MAX, 64, u16::MAX as u32 * 8 * 2);
        let err = decode(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }), "{}", err);
    }

    #[test]
    fn test_many_channels_with_missing_data() {
        let bytes = with_channels(u16::MAX, 8, u16::MAX as u32 * 1000);
        let err = decode(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, Error::ShortRead { .. }), "{}", err);
    }

    #[test]
    fn test_missing_file() {
        let err = decode_file("/nonexistent/sigwave/missing.wav").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_trailing_partial_frame_ignored() {
        let format = WavFormat {
            channels: 1,
            sample_rate: 1000,
            width: SampleWidth::Two,
        };
        let channels = decode(wav(format, &[1, 2, 3]).as_slice()).unwrap();
        assert_eq!(channels[0].data(), [1, 2]);
    }
}
