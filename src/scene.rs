//! The scenes a user can pick, and the simulation each one runs

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::physics::circle::CircularMotion;
use crate::physics::integrators::IntegratorKind;
use crate::physics::math::{Scalar, Vector};
use crate::physics::pendulum::{AnchorMode, PendulumSystem};
use crate::physics::spring::Spring;
use crate::physics::state::ParticleState;
use crate::physics::topology::{ChainConfig, GridConfig};
use crate::simulation::{Simulation, SpringSegments, StepReport, TimeRemainder};

/// A single particle in uniform circular motion
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CircleConfig {
    pub angular_rate: Scalar,
    pub radius: Scalar,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            angular_rate: 1.0,
            radius: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneConfig {
    Circle(CircleConfig),
    Pendulum(ChainConfig),
    Cloth(GridConfig),
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig::Cloth(GridConfig::default())
    }
}

impl SceneConfig {
    pub fn name(&self) -> &'static str {
        match self {
            SceneConfig::Circle(_) => "circle",
            SceneConfig::Pendulum(_) => "pendulum",
            SceneConfig::Cloth(_) => "cloth",
        }
    }

    /// Default configuration for a scene name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "circle" => Some(SceneConfig::Circle(CircleConfig::default())),
            "pendulum" | "chain" => Some(SceneConfig::Pendulum(ChainConfig::default())),
            "cloth" | "grid" => Some(SceneConfig::Cloth(GridConfig::default())),
            _ => None,
        }
    }
}

/// Explicit starting conditions. Empty lists fall back to the scene's own
/// layout and to particles at rest.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct InitialConditions {
    pub positions: Vec<[Scalar; 3]>,
    pub velocities: Vec<[Scalar; 3]>,
}

impl InitialConditions {
    /// Combine with a scene's generated layout
    pub fn resolve(&self, generated: Vec<Vector>) -> Result<ParticleState> {
        let positions = if self.positions.is_empty() {
            generated
        } else {
            if self.positions.len() != generated.len() {
                return Err(SimulationError::LengthMismatch {
                    what: "initial positions",
                    expected: generated.len(),
                    actual: self.positions.len(),
                });
            }
            self.positions.iter().copied().map(Vector::from_array).collect()
        };

        let state = ParticleState::from_positions(positions);
        if self.velocities.is_empty() {
            Ok(state)
        } else {
            state.with_velocities(self.velocities.iter().copied().map(Vector::from_array).collect())
        }
    }
}

/// Integration settings shared by every scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stepping {
    pub integrator: IntegratorKind,
    pub step_size: Scalar,
    pub time_remainder: TimeRemainder,
    pub anchor_mode: AnchorMode,
}

/// A running scene: either an analytic system or a spring network
#[derive(Debug, Clone)]
pub enum SceneSimulation {
    Circle(Simulation<CircularMotion>),
    Network(Simulation<PendulumSystem>),
}

impl SceneSimulation {
    pub fn build(
        scene: &SceneConfig,
        initial: &InitialConditions,
        stepping: Stepping,
    ) -> Result<Self> {
        let simulation = match scene {
            SceneConfig::Circle(circle) => {
                if !circle.angular_rate.is_finite() {
                    return Err(SimulationError::InvalidParameter {
                        name: "angular rate",
                        value: circle.angular_rate,
                    });
                }
                let state = initial.resolve(vec![Vector::new(circle.radius, 0.0, 0.0)])?;
                SceneSimulation::Circle(
                    Simulation::new(
                        CircularMotion::new(circle.angular_rate),
                        state,
                        stepping.integrator,
                        stepping.step_size,
                    )?
                    .with_time_remainder(stepping.time_remainder),
                )
            }
            SceneConfig::Pendulum(chain) => {
                let network = chain.build()?;
                Self::network(network.system, initial.resolve(network.positions)?, stepping)?
            }
            SceneConfig::Cloth(grid) => {
                let network = grid.build()?;
                Self::network(network.system, initial.resolve(network.positions)?, stepping)?
            }
        };
        Ok(simulation)
    }

    fn network(system: PendulumSystem, state: ParticleState, stepping: Stepping) -> Result<Self> {
        let system = system.with_anchor_mode(stepping.anchor_mode);
        Ok(SceneSimulation::Network(
            Simulation::new(system, state, stepping.integrator, stepping.step_size)?
                .with_time_remainder(stepping.time_remainder),
        ))
    }

    pub fn advance(&mut self, frame_dt: Scalar) -> Result<StepReport> {
        match self {
            SceneSimulation::Circle(sim) => sim.advance(frame_dt),
            SceneSimulation::Network(sim) => sim.advance(frame_dt),
        }
    }

    pub fn reset(&mut self) {
        match self {
            SceneSimulation::Circle(sim) => sim.reset(),
            SceneSimulation::Network(sim) => sim.reset(),
        }
    }

    pub fn state(&self) -> &ParticleState {
        match self {
            SceneSimulation::Circle(sim) => sim.state(),
            SceneSimulation::Network(sim) => sim.state(),
        }
    }

    pub fn time(&self) -> Scalar {
        match self {
            SceneSimulation::Circle(sim) => sim.time(),
            SceneSimulation::Network(sim) => sim.time(),
        }
    }

    pub fn integrator(&self) -> IntegratorKind {
        match self {
            SceneSimulation::Circle(sim) => sim.integrator(),
            SceneSimulation::Network(sim) => sim.integrator(),
        }
    }

    /// Springs to draw; circular motion has none
    pub fn springs(&self) -> &[Spring] {
        match self {
            SceneSimulation::Circle(_) => &[],
            SceneSimulation::Network(sim) => sim.system().springs(),
        }
    }

    pub fn spring_segments(&self) -> SpringSegments {
        SpringSegments::from_springs(self.springs())
    }

    pub fn is_fixed(&self, index: usize) -> bool {
        match self {
            SceneSimulation::Circle(_) => false,
            SceneSimulation::Network(sim) => sim.system().is_fixed(index),
        }
    }
}
