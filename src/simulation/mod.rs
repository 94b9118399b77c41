//! Driving a simulation from frame ticks and publishing it to a renderer

pub mod driver;
pub mod trigger;
pub mod visuals;

pub use driver::{Simulation, StepReport, TimeRemainder};
pub use trigger::ResetTrigger;
pub use visuals::{ParticleVisuals, RecordedVisuals, SpringSegments, VisualBinding};
