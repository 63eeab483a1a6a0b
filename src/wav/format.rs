//! RIFF/WAVE header layout and chunk navigation.

use std::io::{self, Read, Seek, SeekFrom, Write};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::pcm::SampleWidth;
use crate::signals::{Time, UNIT_TIME};

pub(crate) const RIFF: &[u8; 4] = b"RIFF";
pub(crate) const WAVE: &[u8; 4] = b"WAVE";
pub(crate) const FMT: &[u8; 4] = b"fmt ";
pub(crate) const DATA: &[u8; 4] = b"data";

/// Linear PCM format code.
pub(crate) const PCM_FORMAT: u16 = 1;

const FMT_LEN: u32 = 16;

/// Bytes between the RIFF size field and the sample data.
pub(crate) const HEADER_OVERHEAD: u32 = 36;

/// Parameters of a linear PCM `"fmt "` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Samples per second.
    pub sample_rate: u32,
    /// Bytes per sample.
    pub width: SampleWidth,
}

impl WavFormat {
    /// Bytes per sample frame, `None` when it overflows the 16-bit field.
    pub fn block_align(&self) -> Option<u16> {
        self.channels.checked_mul(self.width.bytes() as u16)
    }

    /// Bytes per second, `None` when it overflows the 32-bit field.
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate
            .checked_mul(self.block_align()? as u32)
    }

    /// Time between samples.
    pub fn sample_period(&self) -> Time {
        UNIT_TIME
            .checked_div(self.sample_rate as Time)
            .unwrap_or(0)
    }

    /// Writes the RIFF, `"fmt "` and `"data"` headers for `data_len` sample bytes.
    pub(crate) fn write_header<W: Write>(&self, writer: &mut W, data_len: u32) -> Result<()> {
        let (Some(block_align), Some(byte_rate)) = (self.block_align(), self.byte_rate()) else {
            return Err(Error::unsupported(
                format!(
                    "{} channels of {} bytes at {} Hz overflow the format chunk",
                    self.channels,
                    self.width.bytes(),
                    self.sample_rate
                ),
                crate::error::STREAM_ORIGIN,
            ));
        };

        writer.write_all(RIFF)?;
        writer.write_all(&(data_len + HEADER_OVERHEAD).to_le_bytes())?;
        writer.write_all(WAVE)?;

        writer.write_all(FMT)?;
        writer.write_all(&FMT_LEN.to_le_bytes())?;
        writer.write_all(&PCM_FORMAT.to_le_bytes())?;
        writer.write_all(&self.channels.to_le_bytes())?;
        writer.write_all(&self.sample_rate.to_le_bytes())?;
        writer.write_all(&byte_rate.to_le_bytes())?;
        writer.write_all(&block_align.to_le_bytes())?;
        writer.write_all(&self.width.bits().to_le_bytes())?;

        writer.write_all(DATA)?;
        writer.write_all(&data_len.to_le_bytes())?;
        Ok(())
    }
}

/// A byte source whose unwanted chunks can be passed over.
pub(crate) trait ChunkSource: Read {
    fn skip(&mut self, len: u64) -> io::Result<()>;
}

/// Skips by reading and discarding.
pub(crate) struct Sequential<R>(pub R);

impl<R: Read> Read for Sequential<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read> ChunkSource for Sequential<R> {
    fn skip(&mut self, len: u64) -> io::Result<()> {
        let skipped = io::copy(&mut (&mut self.0).take(len), &mut io::sink())?;
        if skipped < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("stream ended {} bytes into a {} byte chunk", skipped, len),
            ));
        }
        Ok(())
    }
}

/// Skips by seeking.
pub(crate) struct Seekable<R>(pub R);

impl<R: Read> Read for Seekable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read + Seek> ChunkSource for Seekable<R> {
    fn skip(&mut self, len: u64) -> io::Result<()> {
        let offset = i64::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "chunk too long to seek"))?;
        self.0.seek(SeekFrom::Current(offset))?;
        Ok(())
    }
}

/// Fills `buf`, reporting a premature end as a malformed header.
fn read_header_bytes<S: Read>(
    source: &mut S,
    buf: &mut [u8],
    description: &str,
    origin: &str,
) -> Result<()> {
    source.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::malformed(description, origin),
        _ => Error::Io(e),
    })
}

/// Skips chunks until one with `id`, returning its declared length.
fn find_chunk<S: ChunkSource>(source: &mut S, id: &[u8; 4], origin: &str) -> Result<u32> {
    let name = String::from_utf8_lossy(id).into_owned();
    loop {
        let mut header = [0u8; 8];
        read_header_bytes(
            source,
            &mut header,
            &format!("not enough data, no {:?} chunk", name),
            origin,
        )?;
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if &header[..4] == id {
            return Ok(len);
        }
        let skipped = String::from_utf8_lossy(&header[..4]).into_owned();
        debug!("skipping {} byte {:?} chunk in {}", len, skipped, origin);
        source.skip(len as u64).map_err(|e| {
            Error::unsupported(format!("cannot skip {:?} chunk: {}", skipped, e), origin)
        })?;
    }
}

/// Reads up to the start of the sample data, returning the format and the
/// declared data length. `source` is left at the first sample byte.
pub(crate) fn read_header<S: ChunkSource>(source: &mut S, origin: &str) -> Result<(WavFormat, u32)> {
    let mut riff = [0u8; 12];
    read_header_bytes(source, &mut riff, "not enough data for RIFF header", origin)?;
    if &riff[..4] != RIFF || &riff[8..] != WAVE {
        return Err(Error::malformed("not WAVE format", origin));
    }

    let fmt_len = find_chunk(source, FMT, origin)?;
    if fmt_len < FMT_LEN {
        return Err(Error::malformed(
            format!("format chunk of {} bytes, need {}", fmt_len, FMT_LEN),
            origin,
        ));
    }
    let mut fmt = [0u8; FMT_LEN as usize];
    read_header_bytes(source, &mut fmt, "not enough data for format chunk", origin)?;
    if fmt_len > FMT_LEN {
        warn!(
            "ignoring {} extra format chunk bytes in {}",
            fmt_len - FMT_LEN,
            origin
        );
        source.skip((fmt_len - FMT_LEN) as u64).map_err(|e| {
            Error::unsupported(format!("cannot skip format extension: {}", e), origin)
        })?;
    }

    let u16_at = |i: usize| u16::from_le_bytes([fmt[i], fmt[i + 1]]);
    let code = u16_at(0);
    let channels = u16_at(2);
    let sample_rate = u32::from_le_bytes([fmt[4], fmt[5], fmt[6], fmt[7]]);
    let bits = u16_at(14);

    if code != PCM_FORMAT {
        return Err(Error::unsupported(
            format!("format code {}, not PCM", code),
            origin,
        ));
    }
    if channels == 0 {
        return Err(Error::unsupported("no channels", origin));
    }
    if bits % 8 != 0 {
        return Err(Error::unsupported(
            format!("{} bit samples, not whole bytes", bits),
            origin,
        ));
    }
    let width = SampleWidth::from_bits(bits)
        .map_err(|_| Error::unsupported(format!("{} bit samples", bits), origin))?;
    if sample_rate == 0 || sample_rate as Time > UNIT_TIME {
        return Err(Error::unsupported(
            format!("sample rate {} Hz", sample_rate),
            origin,
        ));
    }

    let format = WavFormat {
        channels,
        sample_rate,
        width,
    };
    if format.block_align().is_none() {
        return Err(Error::unsupported(
            format!(
                "{} channels of {} bit samples, frame exceeds {} bytes",
                channels,
                bits,
                u16::MAX
            ),
            origin,
        ));
    }

    let data_len = find_chunk(source, DATA, origin)?;
    Ok((format, data_len))
}
