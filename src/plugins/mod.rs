pub mod camera;
pub mod headless;
pub mod simulation;
