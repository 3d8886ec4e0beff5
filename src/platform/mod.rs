//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic clock injected into the simulation and the loop)
//! - Input events (keyboard and on-screen buttons folded into one input state)

pub mod clock;
pub mod input;

pub use clock::{Clock, ManualClock, SharedClock};
pub use input::{Button, ControlScheme, InputAdapter, InputState};
