//! Scenario configuration: schema, loading, validation.
//!
//! A scenario is the complete input of one closed-loop run. Front-ends edit
//! scenarios; the kernel never sees widget state. Validation happens before
//! the run starts — a scenario that passes [`Scenario::validate`] cannot
//! fail mid-loop.

use std::path::Path;

use ls_control::{OutputLimits, Pid, PidGains};
use ls_plant::{Plant, PlantCatalog, PlantSpec};
use ls_sim::SimOptions;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::metrics::DEFAULT_TOLERANCE;

/// Plant selection: a catalog key or inline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlantChoice {
    /// Reference into the injected catalog by display name.
    Catalog { catalog: String },
    /// Full parameter set carried in the scenario itself.
    Inline(PlantSpec),
}

/// Actuator saturation policy for a run.
///
/// The two source configurations disagree (the altitude scripts clamp to
/// the airframe's thrust range, the charging script applies the raw signal),
/// so the policy is explicit per scenario instead of baked into either the
/// controller or the plant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationChoice {
    /// Use the plant's own actuator range (drone: `[0, max_thrust]`;
    /// battery: unclamped).
    #[default]
    Plant,
    /// Apply the control signal unclamped regardless of the plant.
    Unlimited,
    /// Explicit limits overriding the plant's range.
    Limits { min: f64, max: f64 },
}

fn default_max_steps() -> usize {
    1_000_000
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// One closed-loop run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name for listings and reports.
    pub name: String,
    /// Plant under control.
    pub plant: PlantChoice,
    /// PID gains in standard form.
    pub gains: PidGains,
    /// Target value of the measured variable (height in m, charge in %).
    pub setpoint: f64,
    /// Initial value of the measured variable; the plant starts at rest.
    pub initial: f64,
    /// Total simulated duration (plant time units).
    pub duration: f64,
    /// Fixed step size.
    pub dt: f64,
    /// Actuator saturation policy.
    #[serde(default)]
    pub saturation: SaturationChoice,
    /// Safety limit on the step count.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Settling band half-width as a fraction of the setpoint.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Scenario {
    /// Resolve the plant parameters against a catalog.
    pub fn resolve_plant<'a>(&'a self, catalog: &'a PlantCatalog) -> AppResult<&'a PlantSpec> {
        match &self.plant {
            PlantChoice::Catalog { catalog: name } => Ok(catalog.get(name)?),
            PlantChoice::Inline(spec) => {
                spec.validate()?;
                Ok(spec)
            }
        }
    }

    /// Actuator limits for this run, combining the saturation policy with
    /// the resolved plant's physical range.
    pub fn output_limits(&self, spec: &PlantSpec) -> AppResult<Option<OutputLimits>> {
        let limits = match self.saturation {
            SaturationChoice::Plant => {
                let max = match spec {
                    PlantSpec::Drone(p) => p.actuator_limit(),
                    PlantSpec::Battery(p) => p.actuator_limit(),
                };
                max.map(OutputLimits::from_max).transpose()?
            }
            SaturationChoice::Unlimited => None,
            SaturationChoice::Limits { min, max } => Some(OutputLimits::new(min, max)?),
        };
        Ok(limits)
    }

    /// Simulation options for this run.
    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            dt: self.dt,
            duration: self.duration,
            max_steps: self.max_steps,
            ..SimOptions::default()
        }
    }

    /// Build the controller for this run.
    pub fn controller(&self, spec: &PlantSpec) -> AppResult<Pid> {
        let limits = self.output_limits(spec)?;
        Ok(Pid::new(self.gains, limits)?)
    }

    /// Reject invalid configuration before a run starts.
    ///
    /// Checks everything that would otherwise surface mid-loop or in the
    /// analyzer: plant parameters, gains, step sizing, and the setpoint
    /// (zero setpoint breaks percent overshoot).
    pub fn validate(&self, catalog: &PlantCatalog) -> AppResult<()> {
        let spec = self.resolve_plant(catalog)?;
        self.controller(spec)?;
        self.sim_options().sample_count()?;

        if self.setpoint == 0.0 || !self.setpoint.is_finite() {
            return Err(AppError::InvalidInput(
                "setpoint must be finite and nonzero".to_string(),
            ));
        }
        if !self.initial.is_finite() {
            return Err(AppError::InvalidInput(
                "initial value must be finite".to_string(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(AppError::InvalidInput(
                "tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a scenario from a YAML file.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ScenarioFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let scenario: Scenario = serde_yaml::from_str(&text)?;
    Ok(scenario)
}
