//! The ODE capability integrators are generic over

use crate::error::Result;
use crate::physics::math::Scalar;
use crate::physics::state::StateSpace;

/// A system of first-order ordinary differential equations.
///
/// Implementors turn a state and a time into the state's rate of change.
/// The method must not mutate anything; integrators call it several times
/// per step with trial states.
pub trait OdeSystem {
    type State: StateSpace;

    fn time_derivative(&self, state: &Self::State, time: Scalar) -> Self::State;

    /// Reject a state this system cannot evaluate, such as one with the
    /// wrong particle count. Accepts everything by default.
    fn check_state(&self, _state: &Self::State) -> Result<()> {
        Ok(())
    }

    /// Bring a state in line with the system's constraints before it is
    /// stored as a starting point. Leaves the state alone by default.
    fn constrain(&self, _state: &mut Self::State) {}
}
