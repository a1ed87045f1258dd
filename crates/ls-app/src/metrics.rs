//! Control loop performance metrics analysis.
//!
//! Computes overshoot and settling time from a completed run's measured
//! time series. Non-convergence is data, not an error: a trajectory that
//! never settles simply reports no settling time.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Default tolerance band half-width as a fraction of the setpoint (±2%).
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Performance metrics for one closed-loop run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoopMetrics {
    /// Maximum of the measured variable over the whole trace.
    pub peak_value: Option<f64>,
    /// Timestamp of the peak (first occurrence).
    pub peak_time: Option<f64>,
    /// Peak excess over the setpoint in percent; present only when positive.
    pub overshoot_pct: Option<f64>,
    /// Time of final entry into the tolerance band, if containment holds
    /// through the end of the trace.
    pub settling_time: Option<f64>,
}

impl LoopMetrics {
    /// Returns true if at least some metrics were computed.
    pub fn has_data(&self) -> bool {
        self.peak_value.is_some() || self.settling_time.is_some()
    }
}

/// Compute metrics for a control loop given the measured variable series
/// and the setpoint it tracked.
///
/// # Arguments
/// * `measured_series` - (time, value) pairs for the controlled variable
/// * `setpoint` - target value; must be nonzero (percent overshoot divides by it)
/// * `tolerance` - band half-width as a fraction of the setpoint
pub fn compute_loop_metrics(
    measured_series: &[(f64, f64)],
    setpoint: f64,
    tolerance: f64,
) -> AppResult<LoopMetrics> {
    if measured_series.is_empty() {
        return Err(AppError::InvalidInput(
            "measured series is empty".to_string(),
        ));
    }
    if setpoint == 0.0 || !setpoint.is_finite() {
        return Err(AppError::InvalidInput(
            "setpoint must be finite and nonzero".to_string(),
        ));
    }
    if !(tolerance > 0.0) {
        return Err(AppError::InvalidInput(
            "tolerance must be positive".to_string(),
        ));
    }

    let mut metrics = LoopMetrics::default();

    // Peak of the measured variable (first occurrence wins on ties).
    if let Some(&(peak_time, peak_value)) = measured_series
        .iter()
        .reduce(|best, cand| if cand.1 > best.1 { cand } else { best })
    {
        if peak_value.is_finite() {
            metrics.peak_value = Some(peak_value);
            metrics.peak_time = Some(peak_time);

            let overshoot = (peak_value - setpoint) / setpoint * 100.0;
            if overshoot > 0.0 {
                metrics.overshoot_pct = Some(overshoot);
            }
        }
    }

    metrics.settling_time = compute_settling_time(measured_series, setpoint, tolerance);

    Ok(metrics)
}

/// Time of the first sample that enters the tolerance band and from which
/// every later sample stays inside it.
///
/// A first-crossing check is not enough: a trajectory can enter the band,
/// leave again, and only settle on a later entry. Scanning from the end for
/// the contiguous in-band suffix yields exactly the entry point whose
/// containment survives to the end of the trace.
fn compute_settling_time(series: &[(f64, f64)], setpoint: f64, tolerance: f64) -> Option<f64> {
    let (a, b) = (setpoint * (1.0 - tolerance), setpoint * (1.0 + tolerance));
    let (lower, upper) = (a.min(b), a.max(b));

    let mut entry_time = None;
    for &(time, value) in series.iter().rev() {
        // Band edges count as inside.
        if value >= lower && value <= upper {
            entry_time = Some(time);
        } else {
            break;
        }
    }
    entry_time
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overshoot_peak_and_percent() {
        let measured = vec![
            (0.0, 0.0),
            (1.0, 0.5),
            (2.0, 1.2), // Peak at 1.2 when target is 1.0
            (3.0, 1.1),
            (4.0, 1.0),
        ];

        let metrics = compute_loop_metrics(&measured, 1.0, DEFAULT_TOLERANCE).unwrap();

        assert_eq!(metrics.peak_value, Some(1.2));
        assert_eq!(metrics.peak_time, Some(2.0));
        let overshoot = metrics.overshoot_pct.unwrap();
        assert!((overshoot - 20.0).abs() < 1e-9);
    }

    #[test]
    fn no_overshoot_reported_below_setpoint() {
        let measured = vec![(0.0, 0.0), (1.0, 0.5), (2.0, 0.9), (3.0, 0.95)];

        let metrics = compute_loop_metrics(&measured, 1.0, DEFAULT_TOLERANCE).unwrap();

        assert!(metrics.overshoot_pct.is_none());
        assert_eq!(metrics.peak_value, Some(0.95));
    }

    #[test]
    fn settling_time_equals_first_entry_when_contained() {
        let measured = vec![
            (0.0, 0.0),
            (1.0, 0.8),
            (2.0, 0.99), // Enters the ±2% band here
            (3.0, 1.01),
            (4.0, 1.005),
            (5.0, 1.0),
        ];

        let metrics = compute_loop_metrics(&measured, 1.0, DEFAULT_TOLERANCE).unwrap();

        assert_eq!(metrics.settling_time, Some(2.0));
    }

    #[test]
    fn transient_reentry_does_not_count() {
        // Enters the band at t=2, exits at t=3, re-enters for good at t=4.
        let measured = vec![
            (0.0, 0.0),
            (1.0, 0.8),
            (2.0, 1.0),
            (3.0, 1.05),
            (4.0, 1.01),
            (5.0, 1.0),
            (6.0, 0.999),
        ];

        let metrics = compute_loop_metrics(&measured, 1.0, DEFAULT_TOLERANCE).unwrap();

        assert_eq!(metrics.settling_time, Some(4.0));
    }

    #[test]
    fn no_settling_when_final_sample_is_outside() {
        let measured = vec![(0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.5)];

        let metrics = compute_loop_metrics(&measured, 1.0, DEFAULT_TOLERANCE).unwrap();

        assert!(metrics.settling_time.is_none());
        assert!(metrics.has_data());
    }

    #[test]
    fn whole_trace_in_band_settles_immediately() {
        let measured = vec![(0.0, 1.0), (1.0, 1.01), (2.0, 0.99)];

        let metrics = compute_loop_metrics(&measured, 1.0, DEFAULT_TOLERANCE).unwrap();

        assert_eq!(metrics.settling_time, Some(0.0));
    }

    #[test]
    fn band_edges_count_as_inside() {
        let measured = vec![(0.0, 0.0), (1.0, 0.98), (2.0, 1.02)];

        let metrics = compute_loop_metrics(&measured, 1.0, DEFAULT_TOLERANCE).unwrap();

        assert_eq!(metrics.settling_time, Some(1.0));
    }

    #[test]
    fn divergent_trace_reports_no_settling() {
        let measured: Vec<(f64, f64)> = (0..20).map(|i| (i as f64, (i * i) as f64)).collect();

        let metrics = compute_loop_metrics(&measured, 10.0, DEFAULT_TOLERANCE).unwrap();

        assert!(metrics.settling_time.is_none());
    }

    #[test]
    fn invalid_inputs_rejected() {
        let measured = vec![(0.0, 1.0)];
        assert!(compute_loop_metrics(&[], 1.0, DEFAULT_TOLERANCE).is_err());
        assert!(compute_loop_metrics(&measured, 0.0, DEFAULT_TOLERANCE).is_err());
        assert!(compute_loop_metrics(&measured, 1.0, 0.0).is_err());
        assert!(compute_loop_metrics(&measured, 1.0, -0.1).is_err());
    }
}
