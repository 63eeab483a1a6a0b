//! Sigwave - fixed-point signal algebra with a RIFF/WAVE PCM codec
//!
//! Signals are pure functions from [`Time`] to [`Level`], both 64-bit fixed
//! point. Leaf [`generators`] compose through [`combinators`] and
//! [`modifiers`] into trees that the [`wav`] codec renders to interleaved
//! PCM, one thread per channel. Decoded audio comes back as [`Pcm`] signals
//! that slot into the same trees.
//!
//! ```
//! use sigwave::{Adsr, EncodeConfig, SignalExt, Sine, UNIT_LEVEL, UNIT_TIME, period_for, wav};
//!
//! let tone = Sine::new(period_for(440.0)).multiply(Adsr::new(
//!     UNIT_TIME / 20,
//!     UNIT_TIME / 10,
//!     UNIT_TIME / 2,
//!     UNIT_LEVEL / 2,
//!     UNIT_TIME / 4,
//! ));
//! let bytes = wav::encode_to_vec(vec![tone.boxed()], &EncodeConfig::default()).unwrap();
//! let decoded = wav::decode(bytes.as_slice()).unwrap();
//! assert_eq!(decoded.len(), 1);
//! ```

pub mod combinators;
pub mod error;
pub mod generators;
#[cfg(feature = "graph")]
pub mod graph;
pub mod modifiers;
pub mod pcm;
pub mod signals;
pub mod stream;
pub mod wav;

// Re-export commonly used types at the crate root
pub use combinators::{Add, Multiply, Stack, multiply_levels};
pub use error::{Error, Result};
pub use generators::{
    Adsr, Constant, Noise, Pulse, PulsePattern, RampDown, RampUp, Sigmoid, Sine, Square, Step,
};
pub use modifiers::{
    Delay, Invert, Loop, ProgressiveSpeedUp, Reflect, Reverse, SpeedUp, TimeWarp, Trigger,
};
pub use pcm::{Pcm, SampleWidth};
pub use signals::{
    HALF_LEVEL_BITS, LEVEL_BITS, Level, Signal, SignalExt, Time, UNIT_LEVEL, UNIT_TIME,
    as_fraction, fraction, period_for, units,
};
pub use stream::{PcmStream, open_stream};
pub use wav::{EncodeConfig, decode, decode_file, decode_seekable, encode, encode_to_vec};
