//! Classic fourth-order Runge-Kutta integration

use super::Integrator;
use crate::physics::math::Scalar;
use crate::physics::system::OdeSystem;

/// Fourth-order Runge-Kutta integrator (RK4)
///
/// A multi-stage integrator that provides fourth-order accuracy by combining
/// four intermediate evaluations of the derivative.
///
/// The RK4 algorithm:
/// 1. k1 = f(t, y)
/// 2. k2 = f(t + dt/2, y + k1*dt/2)
/// 3. k3 = f(t + dt/2, y + k2*dt/2)
/// 4. k4 = f(t + dt, y + k3*dt)
/// 5. y(t+dt) = y(t) + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
///
/// Preferred for stiffer spring networks where Euler needs an impractically
/// small step.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrder;

impl Integrator for RungeKuttaFourthOrder {
    fn integrate<S: OdeSystem>(
        &self,
        system: &S,
        state: &S::State,
        start_time: Scalar,
        dt: Scalar,
    ) -> S::State {
        let half_dt = dt * 0.5;
        let mid_time = start_time + half_dt;

        let k1 = system.time_derivative(state, start_time);
        let k2 = system.time_derivative(&(state.clone() + k1.clone() * half_dt), mid_time);
        let k3 = system.time_derivative(&(state.clone() + k2.clone() * half_dt), mid_time);
        let k4 = system.time_derivative(&(state.clone() + k3.clone() * dt), start_time + dt);

        state.clone() + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }

    fn name(&self) -> &'static str {
        "runge_kutta_fourth_order"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["rk4"]
    }

    fn convergence_order(&self) -> usize {
        4
    }

    fn derivative_evaluations(&self) -> usize {
        4
    }
}
