//! Vertical drone dynamics under gravity and thrust.

use crate::error::PlantResult;
use crate::traits::Plant;
use ls_core::ensure_positive;
use serde::{Deserialize, Serialize};

/// Standard gravity used by the vertical motion model.
pub const STANDARD_GRAVITY_M_S2: f64 = 9.81;

/// State of the vertical motion plant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalState {
    /// Height above ground (m).
    pub height_m: f64,
    /// Vertical velocity (m/s), positive up.
    pub velocity_m_s: f64,
}

impl VerticalState {
    /// State at rest at the given height.
    pub fn at_rest(height_m: f64) -> Self {
        Self {
            height_m,
            velocity_m_s: 0.0,
        }
    }
}

/// Physical parameters of one drone airframe.
///
/// Dynamics: `dv/dt = (u - mass * g) / mass`, `dh/dt = v`, with thrust `u`
/// physically limited to `[0, max_thrust_n]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneParams {
    /// Display name (e.g. "DJI Mini 2").
    pub name: String,
    /// Takeoff mass (kg).
    pub mass_kg: f64,
    /// Maximum total thrust (N).
    pub max_thrust_n: f64,
}

impl DroneParams {
    /// Create drone parameters, validating physical constants.
    pub fn new(name: impl Into<String>, mass_kg: f64, max_thrust_n: f64) -> PlantResult<Self> {
        let params = Self {
            name: name.into(),
            mass_kg,
            max_thrust_n,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate physical constants. Deserialized parameter sets must be
    /// re-validated before use.
    pub fn validate(&self) -> PlantResult<()> {
        ensure_positive(self.mass_kg, "mass_kg")?;
        ensure_positive(self.max_thrust_n, "max_thrust_n")?;
        Ok(())
    }

    /// Weight force (N). Thrust below this cannot hover; the resulting
    /// divergent trajectory is valid simulation output, not an error.
    pub fn weight_n(&self) -> f64 {
        self.mass_kg * STANDARD_GRAVITY_M_S2
    }
}

impl Plant for DroneParams {
    type State = VerticalState;

    fn name(&self) -> &str {
        &self.name
    }

    fn derivative(&self, x: &Self::State, u: f64) -> Self::State {
        VerticalState {
            height_m: x.velocity_m_s,
            velocity_m_s: (u - self.mass_kg * STANDARD_GRAVITY_M_S2) / self.mass_kg,
        }
    }

    fn measured(&self, x: &Self::State) -> f64 {
        x.height_m
    }

    fn actuator_limit(&self) -> Option<f64> {
        Some(self.max_thrust_n)
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        VerticalState {
            height_m: a.height_m + b.height_m,
            velocity_m_s: a.velocity_m_s + b.velocity_m_s,
        }
    }

    fn scale(&self, a: &Self::State, k: f64) -> Self::State {
        VerticalState {
            height_m: k * a.height_m,
            velocity_m_s: k * a.velocity_m_s,
        }
    }
}
