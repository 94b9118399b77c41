//! Simulation plugin - Self-contained plugin pattern
//!
//! Owns the running scene, advances it once per frame by the frame's
//! wall-clock delta, and mirrors its particles as spheres and its springs
//! as gizmo lines. Keyboard: `R` resets, `Space` pauses, `Escape` quits.

use crate::error::{Result, SimulationError};
use crate::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Step,
    Draw,
}

/// The scene being simulated
#[derive(Resource, Deref, DerefMut, Debug, Clone)]
pub struct ActiveSimulation(pub SceneSimulation);

/// Sphere entities for each particle, plus the spring geometry
#[derive(Resource, Deref, DerefMut, Debug)]
pub struct ParticleBinding(pub VisualBinding<Entity>);

/// Spring segments to draw this frame, in render coordinates
#[derive(Resource, Default, Debug)]
pub struct SpringLines {
    pub segments: Vec<(Vec3, Vec3)>,
}

#[derive(Resource, Default, Debug)]
struct ResetInput(ResetTrigger);

#[derive(Resource, Debug)]
struct ParticleAssets {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    anchor_material: Handle<StandardMaterial>,
}

#[derive(Component, Debug)]
pub struct ParticleSphere;

/// [`ParticleVisuals`] backed by ECS entities
struct EntityVisuals<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    assets: &'a ParticleAssets,
    lines: &'a mut SpringLines,
}

impl ParticleVisuals for EntityVisuals<'_, '_, '_> {
    type Handle = Entity;

    fn create_primitive(&mut self, position: Vector) -> Entity {
        self.commands
            .spawn((
                ParticleSphere,
                Mesh3d(self.assets.mesh.clone()),
                MeshMaterial3d(self.assets.material.clone()),
                Transform::from_translation(position.as_vec3()),
            ))
            .id()
    }

    fn set_primitive_position(&mut self, handle: &Entity, position: Vector) {
        self.commands
            .entity(*handle)
            .insert(Transform::from_translation(position.as_vec3()));
    }

    fn build_line_geometry(&mut self, positions: &[Vector], pairs: &[[usize; 2]]) {
        self.lines.segments.clear();
        self.lines.segments.extend(
            pairs
                .iter()
                .map(|[a, b]| (positions[*a].as_vec3(), positions[*b].as_vec3())),
        );
    }
}

pub struct SimulationPlugin {
    config: SimulationConfig,
    simulation: SceneSimulation,
}

impl SimulationPlugin {
    /// Build the configured scene, reporting configuration errors before
    /// any window opens
    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        let simulation = config.build_simulation()?;
        Ok(Self { config, simulation })
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        match toml::to_string_pretty(&self.config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        info!(
            "Simulating {} scene: {} particles, {} springs, {} with h = {}",
            self.config.scene.name(),
            self.simulation.state().len(),
            self.simulation.springs().len(),
            self.simulation.integrator(),
            self.config.physics.step_size
        );

        app.insert_resource(self.config.clone());
        app.insert_resource(ActiveSimulation(self.simulation.clone()));
        app.init_resource::<SpringLines>();
        app.init_resource::<ResetInput>();
        app.init_state::<AppState>();

        app.configure_sets(
            Update,
            (
                SimulationSet::Input,
                SimulationSet::Step,
                SimulationSet::Draw,
            )
                .chain(),
        );

        app.add_systems(Startup, spawn_particles);
        app.add_systems(
            Update,
            (
                handle_keyboard.in_set(SimulationSet::Input),
                advance_simulation
                    .in_set(SimulationSet::Step)
                    .run_if(in_state(AppState::Running)),
                draw_springs.in_set(SimulationSet::Draw),
            ),
        );
    }
}

fn to_color([r, g, b]: [f32; 3]) -> Color {
    Color::srgb(r, g, b)
}

fn spawn_particles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut lines: ResMut<SpringLines>,
    config: Res<SimulationConfig>,
    simulation: Res<ActiveSimulation>,
) {
    let rendering = &config.rendering;
    let assets = ParticleAssets {
        mesh: meshes.add(Sphere::new(rendering.particle_radius)),
        material: materials.add(StandardMaterial {
            base_color: to_color(rendering.particle_color),
            ..default()
        }),
        anchor_material: materials.add(StandardMaterial {
            base_color: to_color(rendering.anchor_color),
            ..default()
        }),
    };

    let binding = {
        let mut visuals = EntityVisuals {
            commands: &mut commands,
            assets: &assets,
            lines: &mut lines,
        };
        VisualBinding::create(&mut visuals, simulation.state(), simulation.spring_segments())
    };

    for (index, entity) in binding.handles().iter().enumerate() {
        if simulation.is_fixed(index) {
            commands
                .entity(*entity)
                .insert(MeshMaterial3d(assets.anchor_material.clone()));
        }
    }

    debug!("Spawned {} particle spheres", binding.handles().len());
    commands.insert_resource(ParticleBinding(binding));
    commands.insert_resource(assets);
}

fn publish(
    commands: &mut Commands,
    assets: &ParticleAssets,
    lines: &mut SpringLines,
    binding: &mut ParticleBinding,
    state: &ParticleState,
) {
    let mut visuals = EntityVisuals {
        commands,
        assets,
        lines,
    };
    if let Err(e) = binding.publish(&mut visuals, state) {
        error!("Failed to publish particle positions: {}", e);
    }
}

fn handle_keyboard(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    mut reset: ResMut<ResetInput>,
    mut simulation: ResMut<ActiveSimulation>,
    binding: Option<ResMut<ParticleBinding>>,
    assets: Option<Res<ParticleAssets>>,
    mut lines: ResMut<SpringLines>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        info!("Exiting");
        exit.write(AppExit::Success);
        return;
    }

    if keys.just_pressed(KeyCode::Space) {
        let next = match state.get() {
            AppState::Running => AppState::Paused,
            AppState::Paused => AppState::Running,
        };
        info!("Simulation {:?}", next);
        next_state.set(next);
    }

    if reset.0.update(keys.pressed(KeyCode::KeyR)) {
        simulation.reset();
        info!("Simulation reset");
        if let (Some(mut binding), Some(assets)) = (binding, assets) {
            publish(
                &mut commands,
                &assets,
                &mut lines,
                &mut binding,
                simulation.state(),
            );
        }
    }
}

fn advance_simulation(
    mut commands: Commands,
    time: Res<Time>,
    mut simulation: ResMut<ActiveSimulation>,
    binding: Option<ResMut<ParticleBinding>>,
    assets: Option<Res<ParticleAssets>>,
    mut lines: ResMut<SpringLines>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let (Some(mut binding), Some(assets)) = (binding, assets) else {
        return;
    };

    match simulation.advance(time.delta_secs_f64()) {
        Ok(_) => {}
        Err(e @ SimulationError::Diverged { .. }) => {
            error!("{}. Pausing; press R to reset.", e);
            next_state.set(AppState::Paused);
            return;
        }
        Err(e) => {
            warn!("Skipped frame: {}", e);
            return;
        }
    }

    publish(
        &mut commands,
        &assets,
        &mut lines,
        &mut binding,
        simulation.state(),
    );
}

fn draw_springs(mut gizmos: Gizmos, lines: Res<SpringLines>, config: Res<SimulationConfig>) {
    if !config.rendering.show_springs {
        return;
    }
    let color = to_color(config.rendering.spring_color);
    for (start, end) in &lines.segments {
        gizmos.line(*start, *end, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::topology::ChainConfig;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn create_test_app(config: SimulationConfig) -> App {
        let simulation = config.build_simulation().unwrap();
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_resource::<Assets<Mesh>>();
        app.init_resource::<Assets<StandardMaterial>>();
        app.insert_resource(config);
        app.insert_resource(ActiveSimulation(simulation));
        app.init_resource::<SpringLines>();
        app.init_state::<AppState>();
        app.add_systems(Startup, spawn_particles);
        app
    }

    fn pendulum_config() -> SimulationConfig {
        SimulationConfig {
            scene: SceneConfig::Pendulum(ChainConfig::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_plugin_rejects_bad_config() {
        let mut config = SimulationConfig::default();
        config.physics.integrator = "nope".into();
        assert!(SimulationPlugin::from_config(config).is_err());
    }

    #[test]
    fn test_spawns_one_sphere_per_particle() {
        let mut app = create_test_app(pendulum_config());
        app.update();

        let spheres = app
            .world_mut()
            .query_filtered::<&Transform, With<ParticleSphere>>()
            .iter(app.world())
            .count();
        assert_eq!(spheres, 4);
        assert_eq!(app.world().resource::<SpringLines>().segments.len(), 3);
        assert_eq!(app.world().resource::<ParticleBinding>().handles().len(), 4);
    }

    #[test]
    fn test_advance_moves_particles() {
        let mut app = create_test_app(pendulum_config());
        app.add_systems(Update, advance_simulation);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)));

        app.update();
        app.update();
        app.update();

        let simulation = app.world().resource::<ActiveSimulation>();
        assert!(simulation.time() > 0.0);
        assert!(simulation.state().positions[3].y < 0.0);
        assert_eq!(simulation.state().positions[0], Vector::ZERO);

        let tail = simulation.state().positions[3].as_vec3();
        let binding = app.world().resource::<ParticleBinding>();
        let sphere = binding.handles()[3];
        let transform = app.world().get::<Transform>(sphere).unwrap();
        assert_eq!(transform.translation, tail);
    }

    fn create_keyboard_app() -> App {
        let mut app = create_test_app(pendulum_config());
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ResetInput>();
        app.add_systems(Update, handle_keyboard);
        app.update();
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.clear();
        keys.press(key);
    }

    fn release(app: &mut App, key: KeyCode) {
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.clear();
        keys.release(key);
    }

    fn advance_by(app: &mut App, seconds: Scalar) {
        app.world_mut()
            .resource_mut::<ActiveSimulation>()
            .advance(seconds)
            .unwrap();
    }

    fn time(app: &App) -> Scalar {
        app.world().resource::<ActiveSimulation>().time()
    }

    #[test]
    fn test_held_reset_key_resets_once() {
        let mut app = create_keyboard_app();

        advance_by(&mut app, 0.1);
        press(&mut app, KeyCode::KeyR);
        app.update();
        assert_eq!(time(&app), 0.0);
        let initial = app.world().resource::<ActiveSimulation>().state().clone();

        // Still held: no second reset
        advance_by(&mut app, 0.1);
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
        app.update();
        assert!(time(&app) > 0.0);
        assert_ne!(*app.world().resource::<ActiveSimulation>().state(), initial);

        release(&mut app, KeyCode::KeyR);
        app.update();
        press(&mut app, KeyCode::KeyR);
        app.update();
        assert_eq!(time(&app), 0.0);
        assert_eq!(*app.world().resource::<ActiveSimulation>().state(), initial);
    }

    #[test]
    fn test_space_toggles_pause() {
        let mut app = create_keyboard_app();
        let state = |app: &App| app.world().resource::<State<AppState>>().get().clone();
        assert_eq!(state(&app), AppState::Running);

        press(&mut app, KeyCode::Space);
        app.update();
        release(&mut app, KeyCode::Space);
        app.update();
        assert_eq!(state(&app), AppState::Paused);

        press(&mut app, KeyCode::Space);
        app.update();
        release(&mut app, KeyCode::Space);
        app.update();
        assert_eq!(state(&app), AppState::Running);
    }

    #[test]
    fn test_escape_exits() {
        let mut app = create_keyboard_app();
        assert_eq!(app.should_exit(), None);

        press(&mut app, KeyCode::Escape);
        app.update();
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }
}
