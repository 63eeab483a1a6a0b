//! Single-child wrappers that transform a signal's time or level.

mod level;
mod time;
mod trigger;

pub use level::{Invert, Reflect};
pub use time::{Delay, Loop, ProgressiveSpeedUp, Reverse, SpeedUp, TimeWarp};
pub use trigger::Trigger;
