//! Leaf signals.
//!
//! Every generator is a pure closed-form function of time parameterised by
//! one or two constants.

mod adsr;
mod basic;
mod noise;
mod pattern;

pub use adsr::Adsr;
pub use basic::{Constant, Pulse, RampDown, RampUp, Sigmoid, Sine, Square, Step};
pub use noise::Noise;
pub use pattern::PulsePattern;
