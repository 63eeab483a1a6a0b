//! Serializable descriptions of signal trees.
//!
//! A [`Node`] mirrors one generator, combinator, modifier or PCM buffer, with
//! its children nested inline. Every node carries an explicit `"kind"` tag,
//! so a description can be stored as JSON, read back and built into a live
//! signal without any type registry.
//!
//! ```
//! use sigwave::graph::Node;
//! use sigwave::{Signal, UNIT_TIME};
//!
//! let node = Node::from_json(r#"{
//!     "kind": "delay",
//!     "delay": 1000000000,
//!     "signal": { "kind": "sine", "period": 2272727 }
//! }"#).unwrap();
//! let signal = node.build().unwrap();
//! assert_eq!(signal.level(UNIT_TIME), 0);
//! ```

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::combinators::{Add, Multiply, Stack};
use crate::error::{Error, Result};
use crate::generators::{
    Adsr, Constant, Noise, Pulse, PulsePattern, RampDown, RampUp, Sigmoid, Sine, Square, Step,
};
use crate::modifiers::{
    Delay, Invert, Loop, ProgressiveSpeedUp, Reflect, Reverse, SpeedUp, TimeWarp, Trigger,
};
use crate::pcm::{Pcm, SampleWidth};
use crate::signals::{Level, Signal, Time, UNIT_TIME};

fn default_noise_step() -> Time {
    UNIT_TIME
}

/// One node of a signal tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Constant {
        level: Level,
    },
    Sine {
        period: Time,
    },
    Pulse {
        width: Time,
    },
    Square {
        period: Time,
    },
    RampUp {
        period: Time,
    },
    RampDown {
        period: Time,
    },
    Step,
    Sigmoid {
        steepness: Time,
    },
    Adsr {
        attack: Time,
        decay: Time,
        sustain: Time,
        sustain_level: Level,
        release: Time,
    },
    Noise {
        seed: u64,
        #[serde(default = "default_noise_step")]
        step: Time,
    },
    /// Bits least significant first, one per `unit`.
    PulsePattern {
        bits: Vec<u8>,
        unit: Time,
    },

    Multiply {
        children: Vec<Node>,
    },
    Add {
        children: Vec<Node>,
    },
    Stack {
        children: Vec<Node>,
    },

    Delay {
        signal: Box<Node>,
        delay: Time,
    },
    SpeedUp {
        signal: Box<Node>,
        factor: f64,
    },
    ProgressiveSpeedUp {
        signal: Box<Node>,
        rate: Time,
    },
    Loop {
        signal: Box<Node>,
        length: Time,
    },
    Invert {
        signal: Box<Node>,
    },
    Reverse {
        signal: Box<Node>,
    },
    Reflect {
        signal: Box<Node>,
    },
    TimeWarp {
        signal: Box<Node>,
        modulation: Box<Node>,
        factor: Time,
    },
    /// A trigger; `delay` is where the first search resumes from.
    Trigger {
        signal: Box<Node>,
        trigger: Level,
        rising: bool,
        resolution: Time,
        max_delay: Time,
        #[serde(default)]
        delay: Time,
    },

    /// Raw sample bytes in data chunk layout.
    Pcm {
        sample_period: Time,
        width: SampleWidth,
        data: Vec<u8>,
    },
}

fn positive(kind: &str, field: &str, value: Time) -> Result<Time> {
    if value <= 0 {
        return Err(Error::InvalidGraph(format!(
            "{} {} must be positive, got {}",
            kind, field, value
        )));
    }
    Ok(value)
}

impl Node {
    /// Constructs the signal this node describes.
    ///
    /// Fails when a period, step or length that evaluation divides by is not
    /// positive.
    pub fn build(&self) -> Result<Box<dyn Signal>> {
        let signal: Box<dyn Signal> = match self {
            Node::Constant { level } => Box::new(Constant(*level)),
            Node::Sine { period } => Box::new(Sine::new(positive("sine", "period", *period)?)),
            Node::Pulse { width } => Box::new(Pulse::new(*width)),
            Node::Square { period } => {
                Box::new(Square::new(positive("square", "period", *period)?))
            }
            Node::RampUp { period } => {
                Box::new(RampUp::new(positive("ramp_up", "period", *period)?))
            }
            Node::RampDown { period } => {
                Box::new(RampDown::new(positive("ramp_down", "period", *period)?))
            }
            Node::Step => Box::new(Step),
            Node::Sigmoid { steepness } => {
                Box::new(Sigmoid::new(positive("sigmoid", "steepness", *steepness)?))
            }
            Node::Adsr {
                attack,
                decay,
                sustain,
                sustain_level,
                release,
            } => Box::new(Adsr::new(*attack, *decay, *sustain, *sustain_level, *release)),
            Node::Noise { seed, step } => {
                Box::new(Noise::with_step(*seed, positive("noise", "step", *step)?))
            }
            Node::PulsePattern { bits, unit } => Box::new(PulsePattern::new(
                bits.clone(),
                positive("pulse_pattern", "unit", *unit)?,
            )),

            Node::Multiply { children } => Box::new(Multiply::new(build_all(children)?)),
            Node::Add { children } => Box::new(Add::new(build_all(children)?)),
            Node::Stack { children } => Box::new(Stack::new(build_all(children)?)),

            Node::Delay { signal, delay } => Box::new(Delay::new(signal.build()?, *delay)),
            Node::SpeedUp { signal, factor } => Box::new(SpeedUp::new(signal.build()?, *factor)),
            Node::ProgressiveSpeedUp { signal, rate } => Box::new(ProgressiveSpeedUp::new(
                signal.build()?,
                positive("progressive_speed_up", "rate", *rate)?,
            )),
            Node::Loop { signal, length } => Box::new(Loop::new(
                signal.build()?,
                positive("loop", "length", *length)?,
            )),
            Node::Invert { signal } => Box::new(Invert::new(signal.build()?)),
            Node::Reverse { signal } => Box::new(Reverse::new(signal.build()?)),
            Node::Reflect { signal } => Box::new(Reflect::new(signal.build()?)),
            Node::TimeWarp {
                signal,
                modulation,
                factor,
            } => Box::new(TimeWarp::new(signal.build()?, modulation.build()?, *factor)),
            Node::Trigger {
                signal,
                trigger,
                rising,
                resolution,
                max_delay,
                delay,
            } => Box::new(
                Trigger::new(signal.build()?, *trigger, *rising, *resolution, *max_delay)
                    .with_delay(*delay),
            ),

            Node::Pcm {
                sample_period,
                width,
                data,
            } => Box::new(Pcm::new(
                positive("pcm", "sample_period", *sample_period)?,
                *width,
                data.clone(),
            )),
        };
        Ok(signal)
    }

    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(graph_error)
    }

    /// Parses JSON produced by [`to_json`](Self::to_json) or [`save`](Self::save).
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(graph_error)
    }

    /// Writes indented JSON.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).map_err(graph_error)
    }

    /// Reads JSON.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(graph_error)
    }
}

fn graph_error(e: serde_json::Error) -> Error {
    Error::Graph(e.to_string())
}

fn build_all(children: &[Node]) -> Result<Vec<Box<dyn Signal>>> {
    children.iter().map(Node::build).collect()
}

impl From<&Pcm> for Node {
    fn from(pcm: &Pcm) -> Self {
        Node::Pcm {
            sample_period: pcm.sample_period(),
            width: pcm.width(),
            data: pcm.data().to_vec(),
        }
    }
}
