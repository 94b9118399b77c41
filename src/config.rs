//! Simulation configuration, loaded from TOML
//!
//! Every section falls back to its defaults, so a config file only needs the
//! keys it wants to change. The user config file lives in the platform
//! config directory and can be overridden per key with `SPRINGLOOM__*`
//! environment variables (e.g. `SPRINGLOOM__PHYSICS__STEP_SIZE=0.001`).

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::physics::integrators::{IntegratorKind, IntegratorRegistry};
use crate::physics::math::Scalar;
use crate::physics::pendulum::AnchorMode;
use crate::scene::{InitialConditions, SceneConfig, SceneSimulation, Stepping};
use crate::simulation::TimeRemainder;

const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "SPRINGLOOM";

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub scene: SceneConfig,
    pub initial: InitialConditions,
    pub rendering: RenderingConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Integrator name or alias, resolved through [`IntegratorRegistry`]
    pub integrator: String,
    /// Fixed physical step size in seconds
    pub step_size: Scalar,
    pub time_remainder: TimeRemainder,
    pub anchor_mode: AnchorMode,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorKind::default().name().to_string(),
            step_size: 0.002,
            time_remainder: TimeRemainder::default(),
            anchor_mode: AnchorMode::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderingConfig {
    pub particle_radius: f32,
    pub particle_color: [f32; 3],
    pub anchor_color: [f32; 3],
    pub spring_color: [f32; 3],
    pub show_springs: bool,
    pub camera_distance: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            particle_radius: 0.1,
            particle_color: [0.9, 0.55, 0.2],
            anchor_color: [0.3, 0.6, 1.0],
            spring_color: [0.85, 0.85, 0.85],
            show_springs: true,
            camera_distance: 12.0,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) if path.exists() => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    /// Load configuration from a file, reporting read and parse errors
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimulationError::ConfigLoad(format!("{}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| SimulationError::ConfigLoad(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).map_err(|e| SimulationError::ConfigSave(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SimulationError::ConfigSave(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SimulationError::ConfigSave(format!("{}: {e}", path.display())))?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Location of the per-user config file, if the platform has one
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "springloom")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Layer the user config file (if any) and `SPRINGLOOM__*` environment
    /// variables over the defaults
    pub fn load_from_user_config() -> Self {
        let path = Self::user_config_path();
        match Self::load_layered(path.as_deref(), Self::environment()) {
            Ok(config) => {
                if let Some(path) = path.filter(|p| p.exists()) {
                    info!("Loaded configuration from {}", path.display());
                }
                config
            }
            Err(e) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// `SPRINGLOOM__SECTION__KEY` variables, mapped to `section.key`
    pub fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Defaults, then the TOML file at `path` if it exists, then `env`
    pub fn load_layered(path: Option<&Path>, env: ::config::Environment) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }
        builder
            .add_source(env)
            .build()
            .and_then(|layered| layered.try_deserialize::<Self>())
            .map_err(|e| SimulationError::ConfigLoad(e.to_string()))
    }

    /// Resolve the configured integrator name
    pub fn integrator(&self) -> Result<IntegratorKind> {
        IntegratorRegistry::default().create(&self.physics.integrator)
    }

    pub fn stepping(&self) -> Result<Stepping> {
        Ok(Stepping {
            integrator: self.integrator()?,
            step_size: self.physics.step_size,
            time_remainder: self.physics.time_remainder,
            anchor_mode: self.physics.anchor_mode,
        })
    }

    /// Check everything a simulation would reject, without keeping it
    pub fn validate(&self) -> Result<()> {
        self.build_simulation().map(|_| ())
    }

    pub fn build_simulation(&self) -> Result<SceneSimulation> {
        SceneSimulation::build(&self.scene, &self.initial, self.stepping()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::topology::ChainConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.integrator().unwrap(), IntegratorKind::RungeKuttaFourthOrder);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            [physics]
            integrator = "heun"

            [scene]
            kind = "pendulum"
            length = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.integrator().unwrap(), IntegratorKind::Trapezoidal);
        assert_eq!(config.physics.step_size, PhysicsConfig::default().step_size);
        assert_eq!(
            config.scene,
            SceneConfig::Pendulum(ChainConfig {
                length: 3,
                ..Default::default()
            })
        );
        assert_eq!(config.rendering, RenderingConfig::default());
    }

    #[test]
    fn test_unknown_integrator_is_reported() {
        let mut config = SimulationConfig::default();
        config.physics.integrator = "leapfrog".into();
        assert!(matches!(
            config.validate(),
            Err(SimulationError::UnknownIntegrator { .. })
        ));
    }

    #[test]
    fn test_non_positive_step_size_is_reported() {
        let mut config = SimulationConfig::default();
        config.physics.step_size = 0.0;
        assert_eq!(config.validate(), Err(SimulationError::InvalidStepSize(0.0)));
    }

    #[test]
    fn test_policies_parse_from_snake_case() {
        let config: SimulationConfig = toml::from_str(
            "[physics]\ntime_remainder = \"carry\"\nanchor_mode = \"zero_force\"\n",
        )
        .unwrap();
        assert_eq!(config.physics.time_remainder, TimeRemainder::Carry);
        assert_eq!(config.physics.anchor_mode, AnchorMode::ZeroForce);
    }
}
