//! Springloom library
//!
//! Mass-spring pendulum and cloth simulation driven by interchangeable ODE
//! integrators. The library holds the simulation core and its bevy plugins
//! so both can be exercised by integration tests and benches.

pub mod cli;
pub mod config;
pub mod error;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod scene;
pub mod simulation;
pub mod states;

// Re-export commonly used items
pub use config::SimulationConfig;
pub use error::{Result, SimulationError};
pub use physics::{
    integrators,
    math::{Scalar, Vector},
    state::ParticleState,
};
pub use plugins::{camera::CameraPlugin, simulation::SimulationPlugin};
pub use states::AppState;
