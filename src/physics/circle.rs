//! Uniform circular motion, a system with a closed-form trajectory

use crate::physics::math::{Scalar, Vector};
use crate::physics::state::ParticleState;
use crate::physics::system::OdeSystem;

/// Rotates every particle about the Z axis at `angular_rate` rad/s.
///
/// The position derivative is `ω·(−y, x, 0)`; velocities are not part of the
/// dynamics and stay at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularMotion {
    pub angular_rate: Scalar,
}

impl CircularMotion {
    pub fn new(angular_rate: Scalar) -> Self {
        Self { angular_rate }
    }

    /// Exact position at time `t` for a particle that started at `initial`
    pub fn exact_position(&self, initial: Vector, t: Scalar) -> Vector {
        let (sin, cos) = (self.angular_rate * t).sin_cos();
        Vector::new(
            initial.x * cos - initial.y * sin,
            initial.x * sin + initial.y * cos,
            initial.z,
        )
    }
}

impl Default for CircularMotion {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OdeSystem for CircularMotion {
    type State = ParticleState;

    fn time_derivative(&self, state: &ParticleState, _time: Scalar) -> ParticleState {
        let w = self.angular_rate;
        ParticleState {
            positions: state
                .positions
                .iter()
                .map(|p| Vector::new(-w * p.y, w * p.x, 0.0))
                .collect(),
            velocities: vec![Vector::ZERO; state.len()],
        }
    }
}
