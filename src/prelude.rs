//! Springloom prelude module
//!
//! Re-exports the types most plugins and binaries need, to reduce import
//! boilerplate.

// External crate re-exports
pub use bevy::prelude::*;

// Internal re-exports - Config
pub use crate::config::SimulationConfig;

// Internal re-exports - States
pub use crate::states::AppState;

// Internal re-exports - Physics
pub use crate::physics::integrators::{IntegratorKind, IntegratorRegistry};
pub use crate::physics::math::{Scalar, Vector};
pub use crate::physics::state::ParticleState;

// Internal re-exports - Simulation
pub use crate::scene::{SceneConfig, SceneSimulation};
pub use crate::simulation::{ParticleVisuals, ResetTrigger, SpringSegments, VisualBinding};
