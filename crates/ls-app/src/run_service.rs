//! Run execution service.
//!
//! `run_scenario` is the pure function front-ends call on every
//! configuration change: validate, simulate, analyze, return plain data.
//! Batches fan out over independent runs; each run owns its controller and
//! plant state, so no synchronization is needed beyond the shared read-only
//! catalog.

use ls_plant::{ChargeState, PlantCatalog, PlantSpec, VerticalState};
use ls_sim::{run_loop, SimTrace};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::AppResult;
use crate::metrics::{compute_loop_metrics, LoopMetrics};
use crate::scenario::Scenario;

/// One named value series of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct Channel {
    pub name: &'static str,
    pub values: Vec<f64>,
}

/// Complete output of one closed-loop run: time base, value channels, and
/// derived metrics. Rendering collaborators consume this as-is.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Scenario name this outcome belongs to.
    pub scenario: String,
    /// Sample times, one per step.
    pub time: Vec<f64>,
    /// Name of the channel the controller tracked.
    pub measured: &'static str,
    /// Value channels, one value per sample each.
    pub channels: Vec<Channel>,
    /// Derived performance metrics.
    pub metrics: LoopMetrics,
}

impl RunOutcome {
    /// Look up a channel by name.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Number of samples in this outcome.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Execute one scenario: validate, run the closed loop, compute metrics.
pub fn run_scenario(catalog: &PlantCatalog, scenario: &Scenario) -> AppResult<RunOutcome> {
    scenario.validate(catalog)?;

    let spec = scenario.resolve_plant(catalog)?.clone();
    let pid = scenario.controller(&spec)?;
    let opts = scenario.sim_options();

    match spec {
        PlantSpec::Drone(drone) => {
            let trace = run_loop(
                &drone,
                &pid,
                scenario.setpoint,
                VerticalState::at_rest(scenario.initial),
                &opts,
            )?;
            let measured_series = trace.series_of(|s| s.height_m);
            let metrics =
                compute_loop_metrics(&measured_series, scenario.setpoint, scenario.tolerance)?;

            let height = trace.x.iter().map(|s| s.height_m).collect();
            let velocity = trace.x.iter().map(|s| s.velocity_m_s).collect();
            Ok(assemble(
                scenario,
                trace,
                "height_m",
                vec![
                    Channel {
                        name: "height_m",
                        values: height,
                    },
                    Channel {
                        name: "velocity_m_s",
                        values: velocity,
                    },
                ],
                metrics,
            ))
        }
        PlantSpec::Battery(pack) => {
            let trace = run_loop(
                &pack,
                &pid,
                scenario.setpoint,
                ChargeState::at_soc_fraction(&pack, scenario.initial / 100.0),
                &opts,
            )?;
            let measured_series = trace.series_of(|s| pack.soc_pct(s));
            let metrics =
                compute_loop_metrics(&measured_series, scenario.setpoint, scenario.tolerance)?;

            let charge = trace.x.iter().map(|s| s.charge_ah).collect();
            let soc = trace.x.iter().map(|s| pack.soc_pct(s)).collect();
            Ok(assemble(
                scenario,
                trace,
                "soc_pct",
                vec![
                    Channel {
                        name: "charge_ah",
                        values: charge,
                    },
                    Channel {
                        name: "soc_pct",
                        values: soc,
                    },
                ],
                metrics,
            ))
        }
    }
}

/// Execute independent scenarios concurrently.
///
/// Each run owns its own controller and plant state; the catalog is the
/// only shared input and is never mutated.
pub fn run_batch(catalog: &PlantCatalog, scenarios: &[Scenario]) -> Vec<AppResult<RunOutcome>> {
    scenarios
        .par_iter()
        .map(|scenario| run_scenario(catalog, scenario))
        .collect()
}

fn assemble<S>(
    scenario: &Scenario,
    trace: SimTrace<S>,
    measured: &'static str,
    mut channels: Vec<Channel>,
    metrics: LoopMetrics,
) -> RunOutcome {
    channels.push(Channel {
        name: "control",
        values: trace.u,
    });
    RunOutcome {
        scenario: scenario.name.clone(),
        time: trace.t,
        measured,
        channels,
        metrics,
    }
}
