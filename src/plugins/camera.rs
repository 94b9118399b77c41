//! Camera plugin - Self-contained plugin pattern
//!
//! Spawns an orbit camera aimed at the scene and a light for the particle
//! spheres.

use crate::prelude::*;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use bevy_panorbit_camera::TouchControls;
use bevy_panorbit_camera::TrackpadBehavior;

/// Plugin that handles camera setup and control
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanOrbitCameraPlugin);
        app.add_systems(Startup, (spawn_camera, spawn_light));
    }
}

/// Centre of the scene's starting layout, used as the orbit focus
fn layout_center(simulation: &SceneSimulation) -> Vec3 {
    let positions = &simulation.state().positions;
    if positions.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vector = positions.iter().copied().sum();
    (sum / positions.len() as Scalar).as_vec3()
}

fn spawn_camera(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    simulation: Res<crate::plugins::simulation::ActiveSimulation>,
) {
    let focus = layout_center(&simulation);

    commands.spawn((
        Name::new("Main Camera"),
        Camera {
            hdr: true,
            clear_color: ClearColorConfig::Custom(Color::srgb(0.05, 0.05, 0.08)),
            ..default()
        },
        Camera3d::default(),
        Tonemapping::AcesFitted,
        Msaa::Sample4,
        PanOrbitCamera {
            focus,
            pitch: Some(0.35),
            yaw: Some(0.6),
            pan_smoothness: 0.0,
            radius: Some(config.rendering.camera_distance),
            touch_enabled: true,
            touch_controls: TouchControls::OneFingerOrbit,
            trackpad_behavior: TrackpadBehavior::blender_default(),
            trackpad_pinch_to_zoom_enabled: true,
            ..default()
        },
    ));
}

fn spawn_light(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
