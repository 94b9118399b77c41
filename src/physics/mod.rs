//! Simulation core: state algebra, force models, topologies and integrators

pub mod circle;
pub mod integrators;
pub mod math;
pub mod pendulum;
pub mod spring;
pub mod state;
pub mod system;
pub mod topology;
