//! Battery state-of-charge dynamics under charge current.

use crate::error::{PlantError, PlantResult};
use crate::traits::Plant;
use ls_core::ensure_positive;
use serde::{Deserialize, Serialize};

/// State of the battery charge plant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    /// Stored charge (Ah).
    pub charge_ah: f64,
}

impl ChargeState {
    /// State at the given fraction of full capacity (0.0..=1.0).
    pub fn at_soc_fraction(params: &BatteryParams, fraction: f64) -> Self {
        Self {
            charge_ah: params.capacity_ah * fraction,
        }
    }
}

/// Physical parameters of one battery pack.
///
/// Dynamics: `dq/dt = efficiency * u * (1 - q/capacity)` — the effective
/// current tapers to zero as the pack approaches full capacity. This
/// self-limiting term is the model; do not linearize it.
///
/// The controller tracks state of charge in percent, so setpoints are
/// expressed as 0..100 rather than Ah.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryParams {
    /// Display name (e.g. "iPhone 16").
    pub name: String,
    /// Maximum capacity (Ah).
    pub capacity_ah: f64,
    /// Maximum charge current the pack accepts (A). Used as the actuator
    /// limit only when a run opts into saturation; the reference charging
    /// configuration applies the control signal unclamped.
    pub max_current_a: f64,
    /// Coulombic efficiency of charging (0..=1).
    pub efficiency: f64,
}

impl BatteryParams {
    /// Create battery parameters, validating physical constants.
    pub fn new(
        name: impl Into<String>,
        capacity_ah: f64,
        max_current_a: f64,
        efficiency: f64,
    ) -> PlantResult<Self> {
        let params = Self {
            name: name.into(),
            capacity_ah,
            max_current_a,
            efficiency,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate physical constants. Deserialized parameter sets must be
    /// re-validated before use.
    pub fn validate(&self) -> PlantResult<()> {
        ensure_positive(self.capacity_ah, "capacity_ah")?;
        ensure_positive(self.max_current_a, "max_current_a")?;
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(PlantError::InvalidArg {
                what: "efficiency must be in (0, 1]",
            });
        }
        Ok(())
    }

    /// State of charge in percent for a given state.
    pub fn soc_pct(&self, state: &ChargeState) -> f64 {
        state.charge_ah / self.capacity_ah * 100.0
    }
}

impl Plant for BatteryParams {
    type State = ChargeState;

    fn name(&self) -> &str {
        &self.name
    }

    fn derivative(&self, x: &Self::State, u: f64) -> Self::State {
        ChargeState {
            charge_ah: self.efficiency * u * (1.0 - x.charge_ah / self.capacity_ah),
        }
    }

    fn measured(&self, x: &Self::State) -> f64 {
        self.soc_pct(x)
    }

    fn actuator_limit(&self) -> Option<f64> {
        // Reference charging configuration omits saturation; runs opt in
        // explicitly via scenario limits.
        None
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        ChargeState {
            charge_ah: a.charge_ah + b.charge_ah,
        }
    }

    fn scale(&self, a: &Self::State, k: f64) -> Self::State {
        ChargeState {
            charge_ah: k * a.charge_ah,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_rate_tapers_toward_full() {
        let pack = BatteryParams::new("test", 4.5, 3.0, 0.9).unwrap();

        let empty = ChargeState { charge_ah: 0.0 };
        let half = ChargeState { charge_ah: 2.25 };
        let full = ChargeState { charge_ah: 4.5 };

        let d_empty = pack.derivative(&empty, 3.0).charge_ah;
        let d_half = pack.derivative(&half, 3.0).charge_ah;
        let d_full = pack.derivative(&full, 3.0).charge_ah;

        assert!((d_empty - 0.9 * 3.0).abs() < 1e-12);
        assert!((d_half - 0.9 * 3.0 * 0.5).abs() < 1e-12);
        assert!(d_full.abs() < 1e-12);
        assert!(d_empty > d_half && d_half > d_full);
    }

    #[test]
    fn soc_percent_projection() {
        let pack = BatteryParams::new("test", 4.0, 3.0, 0.9).unwrap();
        let state = ChargeState::at_soc_fraction(&pack, 0.25);
        assert!((pack.measured(&state) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_params_rejected() {
        assert!(BatteryParams::new("bad", 0.0, 3.0, 0.9).is_err());
        assert!(BatteryParams::new("bad", 4.5, -1.0, 0.9).is_err());
        assert!(BatteryParams::new("bad", 4.5, 3.0, 0.0).is_err());
        assert!(BatteryParams::new("bad", 4.5, 3.0, 1.5).is_err());
    }
}
