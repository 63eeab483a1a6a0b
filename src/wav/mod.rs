//! RIFF/WAVE linear PCM codec.
//!
//! [`encode`] renders any number of signals as interleaved channels;
//! [`decode`] and its variants turn a WAVE stream back into one [`Pcm`]
//! signal per channel. Sample widths of 1, 2, 3, 4, 6 and 8 bytes are
//! supported in both directions, and decoding then re-encoding at the same
//! rate and width reproduces the sample bytes exactly.
//!
//! [`Pcm`]: crate::pcm::Pcm

mod config;
mod decode;
mod encode;
mod format;

pub use config::EncodeConfig;
pub use decode::{decode, decode_file, decode_seekable};
pub use encode::{encode, encode_to_vec};
pub use format::WavFormat;

pub(crate) use format::{Sequential, read_header};
