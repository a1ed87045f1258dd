//! Standard-form PID controller.
//!
//! Output law, one transition per step:
//!
//! ```text
//! e       = setpoint - measured
//! I      += e * dt / Ti          (skipped when Ti == 0)
//! D       = (e - e_prev) / dt    (zero when dt == 0)
//! output  = Kp * (e + I + Td * D)
//! ```
//!
//! All three terms are scaled by `Kp` (textbook standard form, not the
//! independent-gains form). `Ti == 0` is the explicit "no integral action"
//! configuration: the accumulator update is skipped and the frozen
//! accumulator still enters the sum. Saturation is applied only when
//! [`OutputLimits`] are configured.

use crate::error::{ControlError, ControlResult};
use ls_core::ensure_finite;
use serde::{Deserialize, Serialize};

/// Actuator output limits `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputLimits {
    pub min: f64,
    pub max: f64,
}

impl OutputLimits {
    /// Create output limits, rejecting an empty range.
    pub fn new(min: f64, max: f64) -> ControlResult<Self> {
        ensure_finite(min, "limit min")?;
        ensure_finite(max, "limit max")?;
        if min >= max {
            return Err(ControlError::InvalidArg {
                what: "limit min must be less than limit max",
            });
        }
        Ok(Self { min, max })
    }

    /// Limits `[0, max]`, the physically achievable range of a one-sided
    /// actuator (thrust, charge current).
    pub fn from_max(max: f64) -> ControlResult<Self> {
        Self::new(0.0, max)
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// PID gains in standard form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral time constant. Zero disables integral action.
    pub ti: f64,
    /// Derivative time constant.
    pub td: f64,
}

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pid {
    /// Controller gains.
    pub gains: PidGains,
    /// Optional actuator saturation. `None` applies the output unclamped.
    pub limits: Option<OutputLimits>,
}

impl Pid {
    /// Create a PID controller.
    ///
    /// # Errors
    ///
    /// Rejects non-finite gains, negative `ti` (zero is the documented
    /// no-integral configuration), and negative `td`.
    pub fn new(gains: PidGains, limits: Option<OutputLimits>) -> ControlResult<Self> {
        ensure_finite(gains.kp, "kp")?;
        ensure_finite(gains.ti, "ti")?;
        ensure_finite(gains.td, "td")?;
        if gains.ti < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "ti must be non-negative (zero disables integral action)",
            });
        }
        if gains.td < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "td must be non-negative",
            });
        }
        Ok(Self { gains, limits })
    }

    /// Whether integral action is enabled.
    pub fn has_integral_action(&self) -> bool {
        self.gains.ti != 0.0
    }

    /// Compute controller output given the measured value and setpoint.
    ///
    /// Returns the updated state and the (possibly saturated) control
    /// signal. This is the only state transition; there is no error path.
    pub fn update(
        &self,
        state: &PidState,
        measured: f64,
        setpoint: f64,
        dt: f64,
    ) -> (PidState, f64) {
        let error = setpoint - measured;

        // Accumulator carries the 1/Ti fold, so the output law below stays
        // a plain sum of the three terms.
        let integral = if self.gains.ti != 0.0 {
            state.integral + error * dt / self.gains.ti
        } else {
            state.integral
        };

        let derivative = if dt != 0.0 {
            (error - state.prev_error) / dt
        } else {
            0.0
        };

        let raw = self.gains.kp * (error + integral + self.gains.td * derivative);
        let output = match &self.limits {
            Some(limits) => limits.clamp(raw),
            None => raw,
        };

        let new_state = PidState {
            integral,
            prev_error: error,
        };

        (new_state, output)
    }
}

/// PID controller state, reset at the start of each run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    /// Integral accumulator (already folded by `1/Ti`).
    pub integral: f64,
    /// Error from the previous step, for derivative estimation.
    pub prev_error: f64,
}

impl Default for PidState {
    fn default() -> Self {
        Self {
            integral: 0.0,
            prev_error: 0.0,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn saturated_output_stays_within_limits(
            kp in -50.0_f64..50.0,
            ti in 0.0_f64..10.0,
            td in 0.0_f64..5.0,
            measured in prop::collection::vec(-100.0_f64..100.0, 1..50),
            setpoint in -100.0_f64..100.0,
            max in 0.1_f64..200.0,
        ) {
            let pid = Pid::new(
                PidGains { kp, ti, td },
                Some(OutputLimits::from_max(max).unwrap()),
            ).unwrap();

            let mut state = PidState::default();
            for pv in measured {
                let (new_state, output) = pid.update(&state, pv, setpoint, 0.01);
                state = new_state;
                prop_assert!((0.0..=max).contains(&output));
            }
        }

        #[test]
        fn unsaturated_and_saturated_agree_inside_the_band(
            kp in 0.1_f64..5.0,
            error in -0.5_f64..0.5,
        ) {
            let gains = PidGains { kp, ti: 0.0, td: 0.0 };
            let clamped = Pid::new(gains, Some(OutputLimits::new(-100.0, 100.0).unwrap())).unwrap();
            let free = Pid::new(gains, None).unwrap();

            let (_, a) = clamped.update(&PidState::default(), 0.0, error, 0.01);
            let (_, b) = free.update(&PidState::default(), 0.0, error, 0.01);
            prop_assert!((a - b).abs() < 1e-12);
        }
    }
}
