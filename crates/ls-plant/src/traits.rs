//! Core trait for plant models.

/// Trait for a continuous-time plant driven by a scalar control input.
///
/// A plant must provide:
/// - a state type (Clone, for integrator stage snapshots)
/// - the state derivative `x_dot = f(x, u)` for a held control input
/// - a scalar "measured" projection of the state (the controlled variable)
/// - state arithmetic for integration: add states, scale by scalar
///
/// `derivative` must be pure and defined for every real `u`; saturating the
/// control input is the caller's responsibility, not the plant's.
pub trait Plant: Send + Sync {
    /// State type (must be Clone).
    type State: Clone + std::fmt::Debug;

    /// Display name for catalog listings and diagnostics.
    fn name(&self) -> &str;

    /// Compute state derivative `x_dot = f(x, u)`.
    fn derivative(&self, x: &Self::State, u: f64) -> Self::State;

    /// Scalar projection of the state that the controller tracks.
    fn measured(&self, x: &Self::State) -> f64;

    /// Upper actuator limit, if this plant saturates its control input.
    ///
    /// `Some(max)` means the physically achievable range is `[0, max]`.
    /// `None` means the control signal is applied unclamped.
    fn actuator_limit(&self) -> Option<f64>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = k * a.
    fn scale(&self, a: &Self::State, k: f64) -> Self::State;
}
