//! PCM-backed signals.
//!
//! A [`Pcm`] is a finite signal read from raw sample bytes of any supported
//! [`SampleWidth`]. The decoder produces one per channel and the encoder
//! recognises them to copy bytes straight through.

mod buffer;
mod width;

pub use buffer::Pcm;
pub use width::SampleWidth;
