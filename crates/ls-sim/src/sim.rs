//! Closed-loop run driver and trace recording.

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, Rk4};
use ls_control::{Pid, PidState};
use ls_core::ensure_positive;
use ls_plant::Plant;
use tracing::debug;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 derivative calls per step).
    #[default]
    Rk4,
    /// Forward Euler (1st-order, faster, 1 derivative call per step).
    ForwardEuler,
}

/// Options for closed-loop runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (in the plant's time unit).
    pub dt: f64,
    /// Total simulated duration.
    pub duration: f64,
    /// Maximum number of steps (safety limit against degenerate `dt`).
    pub max_steps: usize,
    /// Integrator type (default: RK4).
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 0.01,
            duration: 60.0,
            max_steps: 1_000_000,
            integrator: IntegratorType::default(),
        }
    }
}

impl SimOptions {
    /// Number of samples this configuration produces, if valid.
    pub fn sample_count(&self) -> SimResult<usize> {
        ensure_positive(self.dt, "dt")?;
        ensure_positive(self.duration, "duration")?;
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }

        let n = (self.duration / self.dt).round();
        if n < 2.0 {
            return Err(SimError::InvalidArg {
                what: "duration/dt must yield at least two samples",
            });
        }
        if n > self.max_steps as f64 {
            return Err(SimError::InvalidArg {
                what: "duration/dt exceeds max_steps",
            });
        }
        Ok(n as usize)
    }
}

/// Record of one completed closed-loop run.
///
/// Parallel arrays, one sample per step: `t[i]` is the sample time, `x[i]`
/// the plant state, and `u[i]` the control applied during the step that
/// produced sample `i+1`. The final control sample has no following state;
/// it is filled with the second-to-last value so the series plot flat-lines
/// instead of dropping to zero.
#[derive(Clone, Debug)]
pub struct SimTrace<S> {
    /// Sample times.
    pub t: Vec<f64>,
    /// State snapshots.
    pub x: Vec<S>,
    /// Control signal per step.
    pub u: Vec<f64>,
}

impl<S> SimTrace<S> {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Extract a `(time, value)` series through a state projection.
    pub fn series_of(&self, f: impl Fn(&S) -> f64) -> Vec<(f64, f64)> {
        self.t.iter().zip(self.x.iter()).map(|(&t, s)| (t, f(s))).collect()
    }

    /// The control signal as a `(time, value)` series.
    pub fn control_series(&self) -> Vec<(f64, f64)> {
        self.t.iter().copied().zip(self.u.iter().copied()).collect()
    }
}

/// Run one closed-loop simulation: sampled PID driving the plant through a
/// fixed-step integrator.
///
/// The loop is strictly sequential. The controller reads the state at sample
/// `i-1`, its output is recorded at `u[i-1]` and held constant while the
/// integrator produces the state at sample `i`. Controller state is owned
/// here and reset at the start of every run.
pub fn run_loop<P: Plant>(
    plant: &P,
    pid: &Pid,
    setpoint: f64,
    initial: P::State,
    opts: &SimOptions,
) -> SimResult<SimTrace<P::State>> {
    let n = opts.sample_count()?;

    debug!(
        plant = plant.name(),
        steps = n,
        dt = opts.dt,
        setpoint,
        "starting closed-loop run"
    );

    let mut t = Vec::with_capacity(n);
    let mut x = Vec::with_capacity(n);
    let mut u = vec![0.0; n];

    t.push(0.0);
    x.push(initial);

    let mut pid_state = PidState::default();

    for i in 1..n {
        let prev = &x[i - 1];
        let (next_pid, output) = pid.update(&pid_state, plant.measured(prev), setpoint, opts.dt);
        pid_state = next_pid;
        u[i - 1] = output;

        let next = match opts.integrator {
            IntegratorType::Rk4 => Rk4.step(plant, prev, output, opts.dt),
            IntegratorType::ForwardEuler => ForwardEuler.step(plant, prev, output, opts.dt),
        };

        t.push(i as f64 * opts.dt);
        x.push(next);
    }

    // The last control sample drives no transition; hold the previous value.
    u[n - 1] = u[n - 2];

    Ok(SimTrace { t, x, u })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls_control::{OutputLimits, PidGains};
    use ls_plant::{DroneParams, VerticalState};

    fn test_pid(limits: Option<OutputLimits>) -> Pid {
        Pid::new(
            PidGains {
                kp: 20.0,
                ti: 4.0,
                td: 1.5,
            },
            limits,
        )
        .unwrap()
    }

    fn test_drone() -> DroneParams {
        DroneParams::new("test", 0.249, 10.0).unwrap()
    }

    #[test]
    fn trace_length_is_rounded_duration_over_dt() {
        let drone = test_drone();
        let pid = test_pid(Some(OutputLimits::from_max(10.0).unwrap()));

        for (duration, dt, expected) in [(60.0, 0.01, 6000), (1.0, 0.1, 10), (0.35, 0.1, 4)] {
            let opts = SimOptions {
                dt,
                duration,
                ..SimOptions::default()
            };
            let trace = run_loop(&drone, &pid, 10.0, VerticalState::at_rest(0.0), &opts).unwrap();
            assert_eq!(trace.len(), expected);
            assert_eq!(trace.x.len(), expected);
            assert_eq!(trace.u.len(), expected);
        }
    }

    #[test]
    fn first_sample_is_the_initial_condition() {
        let drone = test_drone();
        let pid = test_pid(None);
        let opts = SimOptions {
            dt: 0.01,
            duration: 1.0,
            ..SimOptions::default()
        };

        let trace = run_loop(&drone, &pid, 10.0, VerticalState::at_rest(3.0), &opts).unwrap();
        assert_eq!(trace.t[0], 0.0);
        assert_eq!(trace.x[0].height_m, 3.0);
        assert_eq!(trace.x[0].velocity_m_s, 0.0);
    }

    #[test]
    fn final_control_sample_repeats_second_to_last() {
        let drone = test_drone();
        let pid = test_pid(Some(OutputLimits::from_max(10.0).unwrap()));
        let opts = SimOptions {
            dt: 0.01,
            duration: 0.5,
            ..SimOptions::default()
        };

        let trace = run_loop(&drone, &pid, 10.0, VerticalState::at_rest(0.0), &opts).unwrap();
        let n = trace.len();
        assert!(n >= 2);
        assert_eq!(trace.u[n - 1], trace.u[n - 2]);
    }

    #[test]
    fn invalid_options_rejected_before_the_loop() {
        let base = SimOptions::default();

        let zero_dt = SimOptions { dt: 0.0, ..base.clone() };
        assert!(zero_dt.sample_count().is_err());

        let negative_duration = SimOptions {
            duration: -1.0,
            ..base.clone()
        };
        assert!(negative_duration.sample_count().is_err());

        let one_sample = SimOptions {
            dt: 1.0,
            duration: 1.0,
            ..base.clone()
        };
        assert!(one_sample.sample_count().is_err());

        let too_many = SimOptions {
            dt: 1e-9,
            duration: 60.0,
            ..base
        };
        assert!(too_many.sample_count().is_err());
    }

    #[test]
    fn saturating_run_keeps_control_in_range() {
        let drone = test_drone();
        let pid = test_pid(Some(OutputLimits::from_max(drone.max_thrust_n).unwrap()));
        let opts = SimOptions {
            dt: 0.01,
            duration: 5.0,
            ..SimOptions::default()
        };

        let trace = run_loop(&drone, &pid, 50.0, VerticalState::at_rest(0.0), &opts).unwrap();
        assert!(trace
            .u
            .iter()
            .all(|&u| (0.0..=drone.max_thrust_n).contains(&u)));
    }

    #[test]
    fn underpowered_actuator_diverges_as_data() {
        // Thrust cap below hover weight: the drone cannot climb, the run
        // still completes and reports the sinking trajectory.
        let heavy = DroneParams::new("brick", 2.0, 5.0).unwrap();
        let pid = test_pid(Some(OutputLimits::from_max(5.0).unwrap()));
        let opts = SimOptions {
            dt: 0.01,
            duration: 10.0,
            ..SimOptions::default()
        };

        let trace = run_loop(&heavy, &pid, 10.0, VerticalState::at_rest(0.0), &opts).unwrap();
        let last = trace.x.last().unwrap();
        assert!(last.height_m < 0.0);
        assert!(last.height_m.is_finite());
    }
}
