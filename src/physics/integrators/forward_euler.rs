//! Forward Euler integration (explicit Euler)
//!
//! WARNING: This integrator diverges on stiff spring networks unless the step
//! size is very small. It is kept for comparison and for cheap previews.

use super::Integrator;
use crate::physics::math::Scalar;
use crate::physics::system::OdeSystem;

/// Forward Euler integrator
///
/// The simplest one-step method: take the derivative at the start of the
/// step and follow it for the whole step.
///
/// # Algorithm
///
/// ```text
/// f = f(t, y)
/// y(t+dt) = y(t) + dt * f
/// ```
///
/// # Mathematical Properties
///
/// - **Order of accuracy**: O(dt) global error
/// - **Derivative evaluations**: 1 per timestep
/// - **Stability**: Conditionally stable, with a small stability region.
///   Stiff springs (large `k / m`) make the error grow without bound unless
///   `dt` shrinks accordingly.
///
/// # Comparison with Other Methods
///
/// | Property     | Forward Euler | Trapezoidal | RK4 |
/// |--------------|---------------|-------------|-----|
/// | Order        | 1             | 2           | 4   |
/// | Evaluations  | 1             | 2           | 4   |
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn integrate<S: OdeSystem>(
        &self,
        system: &S,
        state: &S::State,
        start_time: Scalar,
        dt: Scalar,
    ) -> S::State {
        let f = system.time_derivative(state, start_time);
        state.clone() + f * dt
    }

    fn name(&self) -> &'static str {
        "forward_euler"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["euler", "explicit_euler"]
    }

    fn convergence_order(&self) -> usize {
        1
    }

    fn derivative_evaluations(&self) -> usize {
        1
    }
}
