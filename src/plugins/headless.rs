//! Windowless runs under `MinimalPlugins`
//!
//! Advances the scene by a fixed frame delta once per app update, publishes
//! every frame to a [`RecordedVisuals`] sink, and exits after the requested
//! number of frames with a report of the final particle positions.

use crate::error::Result;
use crate::prelude::*;
use crate::simulation::RecordedVisuals;

/// Progress of a headless run
#[derive(Resource, Debug)]
pub struct HeadlessRun {
    simulation: SceneSimulation,
    visuals: RecordedVisuals,
    binding: VisualBinding<usize>,
    frame_dt: Scalar,
    frames: usize,
    frame: usize,
    substeps: usize,
}

impl HeadlessRun {
    fn new(simulation: SceneSimulation, frames: usize, frame_dt: Scalar) -> Self {
        let mut visuals = RecordedVisuals::default();
        let binding = VisualBinding::create(
            &mut visuals,
            simulation.state(),
            simulation.spring_segments(),
        );
        Self {
            simulation,
            visuals,
            binding,
            frame_dt,
            frames,
            frame: 0,
            substeps: 0,
        }
    }

    /// Frames simulated so far
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.frames
    }

    pub fn simulation(&self) -> &SceneSimulation {
        &self.simulation
    }

    /// Positions as last published
    pub fn positions(&self) -> &[Vector] {
        &self.visuals.positions
    }

    fn step(&mut self) -> Result<()> {
        let report = self.simulation.advance(self.frame_dt)?;
        self.substeps += report.substeps;
        self.binding
            .publish(&mut self.visuals, self.simulation.state())?;
        self.frame += 1;
        Ok(())
    }

    fn report(&self) {
        info!(
            "Simulated {:.4} s in {} integrator steps",
            self.simulation.time(),
            self.substeps
        );
        println!("t = {:.6}", self.simulation.time());
        for (index, position) in self.positions().iter().enumerate() {
            println!(
                "{index:>4}: {:>12.6} {:>12.6} {:>12.6}",
                position.x, position.y, position.z
            );
        }
    }
}

pub struct HeadlessPlugin {
    scene: &'static str,
    simulation: SceneSimulation,
    frames: usize,
    frame_dt: Scalar,
}

impl HeadlessPlugin {
    pub fn from_config(config: &SimulationConfig, frames: usize, frame_dt: Scalar) -> Result<Self> {
        Ok(Self {
            scene: config.scene.name(),
            simulation: config.build_simulation()?,
            frames,
            frame_dt,
        })
    }
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        info!(
            "Running {} scene headless: {} frames of {} s with {}",
            self.scene,
            self.frames,
            self.frame_dt,
            self.simulation.integrator()
        );

        app.insert_resource(HeadlessRun::new(
            self.simulation.clone(),
            self.frames,
            self.frame_dt,
        ));
        app.add_systems(Update, step_headless);
    }
}

fn step_headless(mut run: ResMut<HeadlessRun>, mut exit: EventWriter<AppExit>) {
    if run.is_finished() {
        run.report();
        exit.write(AppExit::Success);
        return;
    }

    if let Err(e) = run.step() {
        error!("Frame {}: {}", run.frame(), e);
        exit.write(AppExit::error());
    }
}
