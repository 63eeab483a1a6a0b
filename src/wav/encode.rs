//! Rendering signals into an interleaved WAVE stream.
//!
//! Each channel is rendered on its own scoped thread and handed to the
//! writer in blocks through a bounded channel; the writer takes one sample
//! from every channel in turn.

use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread;

use log::{debug, error};

use super::config::EncodeConfig;
use super::format::{HEADER_OVERHEAD, WavFormat};
use crate::error::{Error, Result, STREAM_ORIGIN};
use crate::pcm::{Pcm, SampleWidth};
use crate::signals::{Signal, Time, UNIT_TIME};

/// Samples per block sent from a producer to the writer.
const BLOCK_SAMPLES: usize = 4096;

/// Blocks a producer may run ahead of the writer.
const BLOCKS_IN_FLIGHT: usize = 4;

/// Frames gathered before each write to the sink.
const FRAMES_PER_WRITE: usize = 1024;

type Block = Result<Vec<u8>>;

/// Writes `channels` as a linear PCM WAVE stream.
///
/// Every channel is sampled at `i * config.sample_period()` for
/// `config.sample_count()` samples. A channel that is a PCM buffer (possibly
/// delayed by whole samples) of the target width and period has its bytes
/// copied instead of evaluated, with identical output.
///
/// On error the bytes already written are incomplete and should be
/// discarded.
///
/// # Examples
///
/// ```
/// use sigwave::{EncodeConfig, SignalExt, Sine, UNIT_TIME, wav};
///
/// let config = EncodeConfig::default().with_length(UNIT_TIME / 100);
/// let mut out = Vec::new();
/// wav::encode(&mut out, vec![Sine::new(UNIT_TIME / 440).boxed()], &config).unwrap();
/// assert_eq!(out.len(), 44 + 81 * 2);
/// ```
pub fn encode<W: Write>(
    writer: &mut W,
    channels: Vec<Box<dyn Signal>>,
    config: &EncodeConfig,
) -> Result<()> {
    let format = format_for(channels.len(), config)?;
    let width = config.sample_width;
    let period = config.sample_period();
    let samples = config.sample_count();

    let data_len = samples * width.bytes() as u64 * channels.len() as u64;
    let data_len = u32::try_from(data_len)
        .ok()
        .filter(|len| len.checked_add(HEADER_OVERHEAD).is_some())
        .ok_or(Error::TooLarge { bytes: data_len })?;
    let samples = samples as usize;

    debug!(
        "encoding {} channels of {} samples, {} bytes each at {} Hz",
        channels.len(),
        samples,
        width.bytes(),
        config.sample_rate
    );
    format.write_header(writer, data_len)?;

    thread::scope(|scope| {
        let mut readers = Vec::with_capacity(channels.len());
        for (channel, signal) in channels.into_iter().enumerate() {
            let (sender, receiver) = sync_channel(BLOCKS_IN_FLIGHT);
            scope.spawn(move || produce(channel, signal, width, period, samples, sender));
            readers.push(ChannelReader::new(channel, receiver));
        }
        interleave(writer, &mut readers, samples, width)
    })
}

/// Encodes into a freshly allocated buffer.
pub fn encode_to_vec(channels: Vec<Box<dyn Signal>>, config: &EncodeConfig) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode(&mut out, channels, config)?;
    Ok(out)
}

fn format_for(channels: usize, config: &EncodeConfig) -> Result<WavFormat> {
    let channels = match u16::try_from(channels) {
        Ok(0) | Err(_) => {
            return Err(Error::unsupported(
                format!("cannot encode {} channels", channels),
                STREAM_ORIGIN,
            ));
        }
        Ok(n) => n,
    };
    if config.sample_rate == 0 || config.sample_rate as Time > UNIT_TIME {
        return Err(Error::unsupported(
            format!("cannot encode at {} Hz", config.sample_rate),
            STREAM_ORIGIN,
        ));
    }
    Ok(WavFormat {
        channels,
        sample_rate: config.sample_rate,
        width: config.sample_width,
    })
}

/// The PCM buffer behind `signal` and the sample index it starts at, when its
/// bytes can be copied straight into the output.
fn shortcut(signal: &dyn Signal, width: SampleWidth, period: Time) -> Option<(&Pcm, i64)> {
    let (pcm, start) = signal.pcm_source()?;
    if pcm.width() != width || pcm.sample_period() != period || start % period != 0 {
        return None;
    }
    Some((pcm, start / period))
}

fn produce(
    channel: usize,
    signal: Box<dyn Signal>,
    width: SampleWidth,
    period: Time,
    samples: usize,
    sender: SyncSender<Block>,
) {
    let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
        render(channel, signal.as_ref(), width, period, samples, &sender)
    }));
    if let Err(payload) = rendered {
        let message = panic_message(payload.as_ref());
        error!("channel {} producer failed: {}", channel, message);
        // The writer may already have given up.
        let _ = sender.send(Err(Error::Producer { channel, message }));
    }
}

fn render(
    channel: usize,
    signal: &dyn Signal,
    width: SampleWidth,
    period: Time,
    samples: usize,
    sender: &SyncSender<Block>,
) {
    let size = width.bytes();
    let source = shortcut(signal, width, period);
    match source {
        Some((pcm, first)) => debug!(
            "channel {} copies {} buffered samples starting at sample {}",
            channel,
            pcm.samples(),
            first
        ),
        None => debug!("channel {} evaluates {} samples", channel, samples),
    }

    let mut start = 0;
    while start < samples {
        let count = BLOCK_SAMPLES.min(samples - start);
        let mut block = vec![0u8; count * size];
        for (k, out) in block.chunks_exact_mut(size).enumerate() {
            let i = start + k;
            match source {
                Some((pcm, first)) => copy_sample(pcm, i as i64 - first, width, out),
                None => width.encode(signal.level(i as Time * period), out),
            }
        }
        if sender.send(Ok(block)).is_err() {
            return;
        }
        start += count;
    }
}

fn copy_sample(pcm: &Pcm, index: i64, width: SampleWidth, out: &mut [u8]) {
    let size = width.bytes();
    match usize::try_from(index).ok().filter(|&j| j < pcm.samples()) {
        Some(j) => out.copy_from_slice(&pcm.data()[j * size..(j + 1) * size]),
        None => width.encode(0, out),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "signal evaluation panicked".to_string()
    }
}

/// The writer's end of one channel.
struct ChannelReader {
    channel: usize,
    receiver: Receiver<Block>,
    block: Vec<u8>,
    position: usize,
}

impl ChannelReader {
    fn new(channel: usize, receiver: Receiver<Block>) -> Self {
        Self {
            channel,
            receiver,
            block: Vec::new(),
            position: 0,
        }
    }

    fn next_sample(&mut self, size: usize) -> Result<&[u8]> {
        if self.position >= self.block.len() {
            self.block = match self.receiver.recv() {
                Ok(block) => block?,
                Err(_) => {
                    return Err(Error::Producer {
                        channel: self.channel,
                        message: "ended before its last sample".to_string(),
                    });
                }
            };
            self.position = 0;
        }
        let sample = &self.block[self.position..self.position + size];
        self.position += size;
        Ok(sample)
    }
}

fn interleave<W: Write>(
    writer: &mut W,
    readers: &mut [ChannelReader],
    samples: usize,
    width: SampleWidth,
) -> Result<()> {
    let size = width.bytes();
    let frame = size * readers.len();
    let mut out = Vec::with_capacity(FRAMES_PER_WRITE * frame);
    for _ in 0..samples {
        for reader in readers.iter_mut() {
            out.extend_from_slice(reader.next_sample(size)?);
        }
        if out.len() >= FRAMES_PER_WRITE * frame {
            writer.write_all(&out)?;
            out.clear();
        }
    }
    writer.write_all(&out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Sine, Square};
    use crate::signals::{Level, SignalExt, UNIT_LEVEL};

    struct Exploding;

    impl Signal for Exploding {
        fn level(&self, t: Time) -> Level {
            if t > UNIT_TIME / 2 {
                panic!("level out of reach");
            }
            0
        }
    }

    fn config(width: SampleWidth) -> EncodeConfig {
        EncodeConfig::default()
            .with_sample_rate(100)
            .with_sample_width(width)
    }

    #[test]
    fn test_mono_layout() {
        let out = encode_to_vec(vec![UNIT_LEVEL.boxed()], &config(SampleWidth::Two)).unwrap();
        assert_eq!(out.len(), 44 + 101 * 2);
        assert!(out[44..].chunks(2).all(|s| s == [0xff, 0x7f]));
    }

    #[test]
    fn test_channels_are_interleaved() {
        let channels = vec![UNIT_LEVEL.boxed(), (-UNIT_LEVEL).boxed(), (0 as Level).boxed()];
        let out = encode_to_vec(channels, &config(SampleWidth::One)).unwrap();
        assert_eq!(out.len(), 44 + 101 * 3);
        for frame in out[44..].chunks(3) {
            assert_eq!(frame, [255, 0, 128]);
        }
    }

    #[test]
    fn test_shortcut_matches_evaluation() {
        let width = SampleWidth::Three;
        let period = config(width).sample_period();
        let pcm = Pcm::render(&Sine::new(UNIT_TIME / 7), period, width, 40);
        assert!(shortcut(&pcm, width, period).is_some());

        for delay in [0, 30 * period, -10 * period] {
            let channel = pcm.clone().delay(delay).boxed();
            let copied = encode_to_vec(vec![channel], &config(width)).unwrap();
            let evaluated = Pcm::render(&pcm.clone().delay(delay), period, width, 101);
            assert_eq!(&copied[44..], evaluated.data(), "delay {}", delay);
        }
    }

    #[test]
    fn test_shortcut_requires_matching_layout() {
        let period = 10_000_000;
        let pcm = Pcm::render(&Square::new(UNIT_TIME), period, SampleWidth::Two, 10);
        assert!(shortcut(&pcm, SampleWidth::Four, period).is_none());
        assert!(shortcut(&pcm, SampleWidth::Two, period / 2).is_none());
        assert!(shortcut(&pcm.clone().delay(period / 3), SampleWidth::Two, period).is_none());
        let early = pcm.delay(-2 * period);
        let first = shortcut(&early, SampleWidth::Two, period).map(|(_, i)| i);
        assert_eq!(first, Some(-2));
    }

    #[test]
    fn test_producer_panic_aborts_encode() {
        let channels = vec![Sine::new(UNIT_TIME).boxed(), Exploding.boxed()];
        let err = encode_to_vec(channels, &config(SampleWidth::Two)).unwrap_err();
        assert!(matches!(
            err,
            Error::Producer { channel: 1, ref message } if message.contains("out of reach")
        ));
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(matches!(
            encode_to_vec(Vec::new(), &config(SampleWidth::Two)),
            Err(Error::UnsupportedFormat { .. })
        ));
        let silent = config(SampleWidth::Two).with_sample_rate(0);
        assert!(matches!(
            encode_to_vec(vec![Sine::new(UNIT_TIME).boxed()], &silent),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_too_large() {
        let huge = EncodeConfig::default()
            .with_sample_width(SampleWidth::Eight)
            .with_length(1_000_000 * UNIT_TIME);
        let mut sink = Vec::new();
        assert!(matches!(
            encode(&mut sink, vec![Sine::new(UNIT_TIME).boxed()], &huge),
            Err(Error::TooLarge { .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_many_blocks() {
        let config = EncodeConfig::default()
            .with_sample_rate(20_000)
            .with_sample_width(SampleWidth::Two);
        let out = encode_to_vec(vec![Square::new(UNIT_TIME / 50).boxed()], &config).unwrap();
        assert_eq!(out.len(), 44 + 20_001 * 2);
        let period = config.sample_period();
        let expected = Pcm::render(&Square::new(UNIT_TIME / 50), period, SampleWidth::Two, 20_001);
        assert_eq!(&out[44..], expected.data());
    }
}
