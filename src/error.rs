//! Error types for simulation construction and stepping
//!
//! Configuration problems are reported to the caller instead of being clamped.
//! Degenerate numerical cases such as zero-length springs are not errors and
//! never show up here.

use std::fmt;

use crate::physics::math::Scalar;

/// Errors raised while building or advancing a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Physical step size must be positive and finite
    InvalidStepSize(Scalar),
    /// Particle mass must be positive and finite
    InvalidMass { index: usize, mass: Scalar },
    /// A named scalar parameter is out of range
    InvalidParameter { name: &'static str, value: Scalar },
    /// A spring endpoint or fixed index does not name a particle
    ParticleOutOfBounds { index: usize, count: usize },
    /// A spring connects a particle to itself
    DegenerateSpring { index: usize },
    /// Two per-particle sequences that must agree in length do not
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Cloth grids need at least two rows and two columns
    InvalidGridDimensions { rows: usize, cols: usize },
    /// Chains need at least two particles
    InvalidChainLength(usize),
    /// No integrator is registered under this name
    UnknownIntegrator { name: String, available: Vec<String> },
    /// Frame delta must be finite and non-negative
    InvalidFrameDelta(Scalar),
    /// A sub-step produced non-finite positions or velocities
    Diverged { time: Scalar },
    /// Configuration file could not be read or parsed
    ConfigLoad(String),
    /// Configuration file could not be written
    ConfigSave(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidStepSize(step) => {
                write!(f, "step size must be positive and finite, got {step}")
            }
            SimulationError::InvalidMass { index, mass } => {
                write!(f, "particle {index} has invalid mass {mass}")
            }
            SimulationError::InvalidParameter { name, value } => {
                write!(f, "parameter `{name}` is out of range: {value}")
            }
            SimulationError::ParticleOutOfBounds { index, count } => {
                write!(f, "particle index {index} out of bounds (count: {count})")
            }
            SimulationError::DegenerateSpring { index } => {
                write!(f, "spring connects particle {index} to itself")
            }
            SimulationError::LengthMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what}: expected {expected} entries, got {actual}"),
            SimulationError::InvalidGridDimensions { rows, cols } => {
                write!(f, "grid must be at least 2x2, got {rows}x{cols}")
            }
            SimulationError::InvalidChainLength(length) => {
                write!(f, "chain needs at least 2 particles, got {length}")
            }
            SimulationError::UnknownIntegrator { name, available } => write!(
                f,
                "unknown integrator '{name}'. Available integrators: {}",
                available.join(", ")
            ),
            SimulationError::InvalidFrameDelta(dt) => {
                write!(f, "frame delta must be finite and non-negative, got {dt}")
            }
            SimulationError::Diverged { time } => {
                write!(f, "simulation diverged at t = {time}")
            }
            SimulationError::ConfigLoad(msg) => write!(f, "failed to load configuration: {msg}"),
            SimulationError::ConfigSave(msg) => write!(f, "failed to save configuration: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {}

pub type Result<T> = std::result::Result<T, SimulationError>;
