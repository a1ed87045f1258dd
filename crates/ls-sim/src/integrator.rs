//! Fixed-step time integrators.
//!
//! The control input is held constant over each step (zero-order hold), so
//! integrators advance an autonomous system between controller samples.

use ls_plant::Plant;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step with the control input held constant.
    fn step<P: Plant>(&self, plant: &P, x: &P::State, u: f64, dt: f64) -> P::State;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
///
/// Per-step error is O(dt^5); at the step sizes the reference scenarios use
/// this is indistinguishable from an adaptive solver on the same interval.
#[derive(Clone, Debug)]
pub struct Rk4;

impl Integrator for Rk4 {
    fn step<P: Plant>(&self, plant: &P, x: &P::State, u: f64, dt: f64) -> P::State {
        let k1 = plant.derivative(x, u);

        let x2 = plant.add(x, &plant.scale(&k1, 0.5 * dt));
        let k2 = plant.derivative(&x2, u);

        let x3 = plant.add(x, &plant.scale(&k2, 0.5 * dt));
        let k3 = plant.derivative(&x3, u);

        let x4 = plant.add(x, &plant.scale(&k3, dt));
        let k4 = plant.derivative(&x4, u);

        // Combine: x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = plant.add(
            &plant.add(&k1, &plant.scale(&k2, 2.0)),
            &plant.add(&plant.scale(&k3, 2.0), &k4),
        );

        plant.add(x, &plant.scale(&k_sum, dt / 6.0))
    }
}

/// Forward Euler (explicit, 1st order, fast for testing).
/// Calls derivative() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<P: Plant>(&self, plant: &P, x: &P::State, u: f64, dt: f64) -> P::State {
        let xdot = plant.derivative(x, u);
        plant.add(x, &plant.scale(&xdot, dt))
    }
}
