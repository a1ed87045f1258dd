//! Discrete feedback controllers for loopsim.
//!
//! Provides the standard-form PID controller used by the simulation driver:
//! all three terms share the proportional gain, the integral accumulator is
//! folded by the integral time constant each step, and actuator saturation
//! is an explicit, optional configuration rather than a property of the
//! controller itself.
//!
//! Controllers are sampled: one `update` call per simulation step, with the
//! output held constant over the following step.

pub mod error;
pub mod pid;

pub use error::{ControlError, ControlResult};
pub use pid::{OutputLimits, Pid, PidGains, PidState};
