//! Frame-driven sub-stepping of an ODE system
//!
//! The driver turns a variable wall-clock frame delta into a sequence of
//! fixed-size integrator steps. Every tick is atomic: the sub-steps run on a
//! working copy of the state, which is only committed if all of them produced
//! finite values.

use bevy::log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::physics::integrators::IntegratorKind;
use crate::physics::math::Scalar;
use crate::physics::state::ParticleState;
use crate::physics::system::OdeSystem;

/// Relative slack when dividing a frame delta into whole steps, so that a
/// delta of exactly `3 * h` is not split into two steps by rounding.
const STEP_COUNT_TOLERANCE: Scalar = 1e-9;

/// What happens to the part of a frame delta that is shorter than one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRemainder {
    /// Discard `Δt mod h`. A delta shorter than `h` is taken as a single
    /// step of size `Δt`.
    #[default]
    Drop,
    /// Accumulate `Δt mod h` into the next tick and only ever take steps of
    /// exactly `h`.
    Carry,
}

/// Outcome of one [`Simulation::advance`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Integrator steps taken
    pub substeps: usize,
    /// Simulated time covered by those steps
    pub simulated: Scalar,
    /// Simulation clock after the tick
    pub time: Scalar,
}

#[derive(Debug, Clone)]
pub struct Simulation<S: OdeSystem<State = ParticleState>> {
    system: S,
    state: ParticleState,
    initial: ParticleState,
    integrator: IntegratorKind,
    step_size: Scalar,
    time: Scalar,
    remainder_policy: TimeRemainder,
    remainder: Scalar,
}

impl<S: OdeSystem<State = ParticleState>> Simulation<S> {
    /// Capture `initial` as the reset target and start the clock at zero
    pub fn new(
        system: S,
        mut initial: ParticleState,
        integrator: IntegratorKind,
        step_size: Scalar,
    ) -> Result<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(SimulationError::InvalidStepSize(step_size));
        }
        system.check_state(&initial)?;
        system.constrain(&mut initial);

        debug!(
            "Created simulation: {} particles, {} with h = {}",
            initial.len(),
            integrator,
            step_size
        );

        Ok(Self {
            system,
            state: initial.clone(),
            initial,
            integrator,
            step_size,
            time: 0.0,
            remainder_policy: TimeRemainder::default(),
            remainder: 0.0,
        })
    }

    pub fn with_time_remainder(mut self, policy: TimeRemainder) -> Self {
        self.remainder_policy = policy;
        self.remainder = 0.0;
        self
    }

    /// Number and size of the steps a frame delta is split into
    fn plan(&self, frame_dt: Scalar) -> (usize, Scalar) {
        let h = self.step_size;
        match self.remainder_policy {
            TimeRemainder::Drop => {
                if frame_dt == 0.0 {
                    (0, h)
                } else if h <= frame_dt {
                    let count = (frame_dt / h * (1.0 + STEP_COUNT_TOLERANCE)).floor();
                    (count as usize, h)
                } else {
                    (1, frame_dt)
                }
            }
            TimeRemainder::Carry => {
                let total = self.remainder + frame_dt;
                let count = (total / h * (1.0 + STEP_COUNT_TOLERANCE)).floor();
                (count as usize, h)
            }
        }
    }

    /// Advance the simulation clock by a frame delta.
    ///
    /// On error the state, clock and carried remainder are left exactly as
    /// they were before the call.
    pub fn advance(&mut self, frame_dt: Scalar) -> Result<StepReport> {
        if !(frame_dt.is_finite() && frame_dt >= 0.0) {
            return Err(SimulationError::InvalidFrameDelta(frame_dt));
        }

        let (substeps, dt) = self.plan(frame_dt);
        let mut working = self.state.clone();
        let mut time = self.time;

        for _ in 0..substeps {
            working = self.integrator.integrate(&self.system, &working, time, dt);
            time += dt;
            if !working.is_finite() {
                warn!(
                    "{} diverged at t = {:.6} (h = {})",
                    self.integrator, time, dt
                );
                return Err(SimulationError::Diverged { time });
            }
        }

        let simulated = substeps as Scalar * dt;
        if self.remainder_policy == TimeRemainder::Carry {
            self.remainder = (self.remainder + frame_dt - simulated).max(0.0);
        }
        self.state = working;
        self.time = time;

        let report = StepReport {
            substeps,
            simulated,
            time,
        };
        trace!("{:?}", report);
        Ok(report)
    }

    /// Restore the initial state and zero the clock
    pub fn reset(&mut self) {
        self.state.clone_from(&self.initial);
        self.time = 0.0;
        self.remainder = 0.0;
        debug!("Simulation reset");
    }

    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    pub fn initial_state(&self) -> &ParticleState {
        &self.initial
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn time(&self) -> Scalar {
        self.time
    }

    /// Frame time not yet simulated; always zero under [`TimeRemainder::Drop`]
    pub fn pending_remainder(&self) -> Scalar {
        self.remainder
    }

    pub fn integrator(&self) -> IntegratorKind {
        self.integrator
    }

    pub fn set_integrator(&mut self, integrator: IntegratorKind) {
        self.integrator = integrator;
    }

    pub fn step_size(&self) -> Scalar {
        self.step_size
    }

    pub fn time_remainder(&self) -> TimeRemainder {
        self.remainder_policy
    }
}
