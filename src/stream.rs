//! Mono PCM signal read incrementally from a byte stream.

use std::cell::{Cell, RefCell};
use std::io::{self, Read};

use log::{debug, error};

use crate::error::{Error, Result, STREAM_ORIGIN};
use crate::pcm::SampleWidth;
use crate::signals::{Level, Signal, Time, UNIT_TIME};
use crate::wav::{Sequential, read_header};

/// Bytes held at once; a whole number of samples for every supported width.
pub const WINDOW_BYTES: usize = 2880;

const WAVE_TYPES: [&str; 4] = ["audio/wav", "audio/x-wav", "audio/wave", "sound/wav"];

const L16_TYPE: &str = "audio/l16";

const L16_DEFAULT_RATE: u32 = 8000;

/// A signal over raw mono samples pulled from a reader one window at a time.
///
/// Only the current window is kept, so queries must come in non-decreasing
/// time order; times before the current window read as zero. A window that
/// cannot be filled completely ends the stream: the failure is logged, every
/// later query returns zero and [`take_error`](Self::take_error) hands back
/// the cause.
///
/// Like [`Trigger`](crate::Trigger) this keeps mutable state behind `&self`,
/// so it can move between threads but never be shared by them.
///
/// # Examples
///
/// ```
/// use sigwave::{PcmStream, SampleWidth, Signal, UNIT_TIME};
///
/// let bytes = vec![0xc0u8; 2880 * 2];
/// let stream = PcmStream::new(bytes.as_slice(), SampleWidth::One, 2880).unwrap();
/// assert!(stream.level(0) > 0);
/// assert!(stream.level(UNIT_TIME + 1) > 0);
/// assert_eq!(stream.level(2 * UNIT_TIME), 0);
/// assert!(stream.take_error().is_some());
/// ```
#[derive(Debug)]
pub struct PcmStream<R> {
    reader: RefCell<R>,
    width: SampleWidth,
    sample_period: Time,
    big_endian: bool,
    window: RefCell<Vec<u8>>,
    start: Cell<Time>,
    loaded: Cell<bool>,
    failed: Cell<bool>,
    error: RefCell<Option<Error>>,
}

impl<R: Read> PcmStream<R> {
    /// Streams raw little-endian samples of `width` at `sample_rate`.
    pub fn new(reader: R, width: SampleWidth, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 || sample_rate as Time > UNIT_TIME {
            return Err(Error::unsupported(
                format!("stream sample rate {} Hz", sample_rate),
                STREAM_ORIGIN,
            ));
        }
        Ok(Self {
            reader: RefCell::new(reader),
            width,
            sample_period: UNIT_TIME / sample_rate as Time,
            big_endian: false,
            window: RefCell::new(vec![0u8; WINDOW_BYTES]),
            start: Cell::new(0),
            loaded: Cell::new(false),
            failed: Cell::new(false),
            error: RefCell::new(None),
        })
    }

    /// Reads samples most significant byte first, as network audio sends them.
    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn width(&self) -> SampleWidth {
        self.width
    }

    pub fn sample_period(&self) -> Time {
        self.sample_period
    }

    /// Whether a refill has failed.
    pub fn is_failed(&self) -> bool {
        self.failed.get()
    }

    /// The refill failure, if one happened and has not been taken yet.
    pub fn take_error(&self) -> Option<Error> {
        self.error.borrow_mut().take()
    }

    /// Duration covered by one window.
    fn span(&self) -> Time {
        (WINDOW_BYTES / self.width.bytes()) as Time * self.sample_period
    }

    fn refill(&self) -> Result<()> {
        let mut window = self.window.borrow_mut();
        self.reader
            .borrow_mut()
            .read_exact(&mut window)
            .map_err(|e| match e.kind() {
                io::ErrorKind::UnexpectedEof => Error::short_read(
                    format!("stream window at {} incomplete", self.start.get()),
                    STREAM_ORIGIN,
                ),
                _ => Error::Io(e),
            })?;
        if self.big_endian {
            for sample in window.chunks_exact_mut(self.width.bytes()) {
                sample.reverse();
            }
        }
        Ok(())
    }

    fn advance_to(&self, t: Time) -> Result<()> {
        while !self.loaded.get() || t >= self.start.get() + self.span() {
            if self.loaded.get() {
                self.start.set(self.start.get() + self.span());
            }
            self.refill()?;
            self.loaded.set(true);
            debug!("stream window refilled at {}", self.start.get());
        }
        Ok(())
    }
}

impl<R: Read + Send> Signal for PcmStream<R> {
    fn level(&self, t: Time) -> Level {
        if self.failed.get() || t < self.start.get() {
            return 0;
        }
        if let Err(e) = self.advance_to(t) {
            error!("PCM stream failed: {}", e);
            self.failed.set(true);
            *self.error.borrow_mut() = Some(e);
            return 0;
        }
        let size = self.width.bytes();
        let index = ((t - self.start.get()) / self.sample_period) as usize;
        self.width
            .decode(&self.window.borrow()[index * size..(index + 1) * size])
    }
}

/// Opens a stream announced with a MIME `content_type`.
///
/// WAVE content has its header parsed and must be mono. `audio/L16` is taken
/// as raw big-endian 2-byte samples (RFC 2586) at its `rate` parameter,
/// 8000 Hz when absent. Any other type is rejected with
/// [`Error::UnrecognizedFormat`].
pub fn open_stream<R: Read>(content_type: &str, mut reader: R) -> Result<PcmStream<R>> {
    let mut parts = content_type.split(';').map(str::trim);
    let media = parts.next().unwrap_or_default().to_ascii_lowercase();

    if WAVE_TYPES.contains(&media.as_str()) {
        let (format, _) = read_header(&mut Sequential(&mut reader), STREAM_ORIGIN)?;
        if format.channels != 1 {
            return Err(Error::unsupported(
                format!("{} channel stream, only mono can be streamed", format.channels),
                STREAM_ORIGIN,
            ));
        }
        return PcmStream::new(reader, format.width, format.sample_rate);
    }

    if media == L16_TYPE {
        let mut rate = L16_DEFAULT_RATE;
        for param in parts {
            if let Some(value) = param.strip_prefix("rate=") {
                rate = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::UnrecognizedFormat(content_type.to_string()))?;
            }
        }
        return Ok(PcmStream::new(reader, SampleWidth::Two, rate)?.big_endian());
    }

    Err(Error::UnrecognizedFormat(content_type.to_string()))
}
