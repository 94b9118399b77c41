//! Command line interface for Springloom

use clap::{Parser, ValueEnum};
use std::fmt;

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::physics::integrators::registry::IntegratorRegistry;
use crate::physics::math::Scalar;
use crate::scene::SceneConfig;
use crate::simulation::TimeRemainder;

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Configuration is loaded but a simulation cannot be built from it
    InvalidConfig(SimulationError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidConfig(err) => write!(f, "Invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<SimulationError> for CliError {
    fn from(err: SimulationError) -> Self {
        CliError::InvalidConfig(err)
    }
}

/// Built-in scenes selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChoice {
    Circle,
    Pendulum,
    Cloth,
}

impl SceneChoice {
    fn name(self) -> &'static str {
        match self {
            SceneChoice::Circle => "circle",
            SceneChoice::Pendulum => "pendulum",
            SceneChoice::Cloth => "cloth",
        }
    }
}

/// Springloom - mass-spring pendulum and cloth simulation
#[derive(Parser, Debug)]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about,
    long_about = None
)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Scene to simulate with its default parameters (overrides config file)
    #[arg(short, long, value_enum)]
    pub scene: Option<SceneChoice>,

    /// Integrator name or alias (e.g., rk4, euler, heun)
    #[arg(short = 'i', long, value_name = "NAME")]
    pub integrator: Option<String>,

    /// Fixed physical step size in seconds (overrides config file)
    #[arg(long, value_name = "SECONDS")]
    pub step_size: Option<Scalar>,

    /// Carry the unsimulated part of each frame into the next one
    #[arg(long)]
    pub carry_remainder: bool,

    /// List available integrators and exit
    #[arg(long)]
    pub list_integrators: bool,

    /// Run without a window and print the final particle positions
    #[arg(long)]
    pub headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, value_name = "COUNT", default_value_t = 600)]
    pub frames: usize,

    /// Frame delta in seconds for headless mode
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0 / 60.0)]
    pub frame_dt: Scalar,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Handles the --list-integrators flag by printing available integrators and exiting
pub fn handle_list_integrators() {
    let registry = IntegratorRegistry::new().with_standard_integrators();
    println!("Available integrators:");
    for name in registry.list_available() {
        if let Ok(kind) = registry.create(&name) {
            println!(
                "  - {name} (order {}, {} evaluations per step)",
                kind.convergence_order(),
                kind.derivative_evaluations()
            );
        }
    }

    let aliases = registry.list_aliases();
    if !aliases.is_empty() {
        println!("\nAliases:");
        for (alias, target) in aliases {
            println!("  - {alias} -> {target}");
        }
    }
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        SimulationConfig::load(config_path).map_err(|err| CliError::ConfigLoad(err.to_string()))?
    } else {
        SimulationConfig::load_from_user_config()
    };

    apply_overrides(&mut config, args)?;
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut SimulationConfig, args: &Args) -> Result<(), CliError> {
    if let Some(scene) = args.scene {
        println!("Using scene: {}", scene.name());
        if let Some(scene_config) = SceneConfig::from_name(scene.name()) {
            if scene_config.name() != config.scene.name() {
                config.scene = scene_config;
                config.initial = Default::default();
            }
        }
    }

    if let Some(integrator) = &args.integrator {
        // Validate integrator name against registry
        let registry = IntegratorRegistry::new().with_standard_integrators();
        let kind = registry.create(integrator)?;
        println!("Using integrator: {kind}");
        config.physics.integrator = kind.name().to_string();
    }

    if let Some(step_size) = args.step_size {
        println!("Overriding step size to: {step_size}");
        config.physics.step_size = step_size;
    }

    if args.carry_remainder {
        config.physics.time_remainder = TimeRemainder::Carry;
    }

    Ok(())
}
