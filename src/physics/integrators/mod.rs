//! Numerical integration schemes for first-order ODE systems
//!
//! Every scheme is a stateless zero-sized type implementing [`Integrator`].
//! Configuration selects one through [`IntegratorKind`], which dispatches to
//! the matching struct without boxing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::physics::math::Scalar;
use crate::physics::system::OdeSystem;

pub mod forward_euler;
pub mod registry;
pub mod runge_kutta;
pub mod trapezoidal;

pub use forward_euler::ForwardEuler;
pub use registry::IntegratorRegistry;
pub use runge_kutta::RungeKuttaFourthOrder;
pub use trapezoidal::Trapezoidal;

/// A one-step scheme advancing any [`OdeSystem`] by `dt`.
///
/// Implementations must be pure: the same inputs always produce the same
/// state, and neither the system nor the input state is modified.
pub trait Integrator: Send + Sync {
    /// Advance `state` from `start_time` to `start_time + dt`
    fn integrate<S: OdeSystem>(
        &self,
        system: &S,
        state: &S::State,
        start_time: Scalar,
        dt: Scalar,
    ) -> S::State
    where
        Self: Sized;

    /// Canonical name used in configuration files and on the command line
    fn name(&self) -> &'static str;

    /// Alternative names accepted by the registry
    fn aliases(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Global order of accuracy
    fn convergence_order(&self) -> usize;

    /// Derivative evaluations per step
    fn derivative_evaluations(&self) -> usize;
}

/// The interchangeable schemes a simulation can be configured with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    #[serde(alias = "euler", alias = "explicit_euler")]
    ForwardEuler,
    #[default]
    #[serde(alias = "rk4")]
    RungeKuttaFourthOrder,
    #[serde(alias = "trapezoid", alias = "heun")]
    Trapezoidal,
}

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 3] = [
        IntegratorKind::ForwardEuler,
        IntegratorKind::RungeKuttaFourthOrder,
        IntegratorKind::Trapezoidal,
    ];

    pub fn integrate<S: OdeSystem>(
        self,
        system: &S,
        state: &S::State,
        start_time: Scalar,
        dt: Scalar,
    ) -> S::State {
        match self {
            IntegratorKind::ForwardEuler => ForwardEuler.integrate(system, state, start_time, dt),
            IntegratorKind::RungeKuttaFourthOrder => {
                RungeKuttaFourthOrder.integrate(system, state, start_time, dt)
            }
            IntegratorKind::Trapezoidal => Trapezoidal.integrate(system, state, start_time, dt),
        }
    }

    fn scheme(self) -> &'static dyn Integrator {
        match self {
            IntegratorKind::ForwardEuler => &ForwardEuler,
            IntegratorKind::RungeKuttaFourthOrder => &RungeKuttaFourthOrder,
            IntegratorKind::Trapezoidal => &Trapezoidal,
        }
    }

    pub fn name(self) -> &'static str {
        self.scheme().name()
    }

    pub fn aliases(self) -> Vec<&'static str> {
        self.scheme().aliases()
    }

    pub fn convergence_order(self) -> usize {
        self.scheme().convergence_order()
    }

    pub fn derivative_evaluations(self) -> usize {
        self.scheme().derivative_evaluations()
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
