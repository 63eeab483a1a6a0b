//! Signal processing types and traits.
//!
//! This module provides the core signal abstractions used throughout the
//! library:
//! - `Time` and `Level`, the fixed-point time and amplitude domains
//! - `Signal` trait with its optional bound, period and PCM capabilities
//! - `SignalExt` trait for building signal trees by chaining

mod core;
mod ext;

pub use core::{
    HALF_LEVEL_BITS, LEVEL_BITS, Level, Signal, Time, UNIT_LEVEL, UNIT_TIME, as_fraction,
    fraction, period_for, units,
};
pub use ext::SignalExt;
