//! # Configuration System
//!
//! YAML configuration for antviz sessions:
//!
//! - Grid resolution and pole clearance
//! - Directivity integration range and display precision
//! - Initial antenna parameters
//! - Logging
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `ANTVIZ_CONFIG` environment variable
//! 2. `./antviz.yaml` (current directory)
//! 3. `~/.config/antviz/config.yaml` (user config)
//! 4. `/etc/antviz/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! grid:
//!   sweep_samples: 1000
//!   mesh_theta_samples: 200
//!   mesh_phi_samples: 200
//!   pole_epsilon: 1.0e-6
//!
//! directivity:
//!   pole_cutoff: 1.0e-6
//!   samples: 10000
//!   precision: 2
//!
//! antenna:
//!   topology: collinear_array
//!   length: 0.5
//!   spacing: 0.5
//!   phase_offset: 0.0
//!   elements: 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::directivity::IntegrationRange;
use crate::engine::EngineSettings;
use crate::grid::{GridPolicy, MAX_POLE_EPSILON, MIN_GRID_SAMPLES};
use crate::observe::LogConfig;
use crate::types::AntennaConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "ANTVIZ_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found
    NotFound(String),
    /// Failed to read configuration file
    ReadError(String),
    /// Failed to parse configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Sampling grids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Samples in the planar [-π, π] sweep
    pub sweep_samples: usize,
    /// Polar samples of the surface mesh
    pub mesh_theta_samples: usize,
    /// Azimuth samples of the surface mesh
    pub mesh_phi_samples: usize,
    /// Minimum clearance from pattern poles (radians)
    pub pole_epsilon: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sweep_samples: 1000,
            mesh_theta_samples: 200,
            mesh_phi_samples: 200,
            pole_epsilon: crate::grid::DEFAULT_POLE_EPSILON,
        }
    }
}

impl GridConfig {
    pub fn policy(&self) -> GridPolicy {
        GridPolicy::new(self.pole_epsilon)
    }
}

/// Complete antviz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AntvizConfig {
    /// Configuration version
    pub version: String,
    /// Sampling grids
    pub grid: GridConfig,
    /// Directivity integration
    pub directivity: IntegrationRange,
    /// Antenna parameters at session start
    pub antenna: AntennaConfig,
    /// Logging configuration
    pub logging: LogConfig,
}

impl Default for AntvizConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            grid: GridConfig::default(),
            directivity: IntegrationRange::default(),
            antenna: AntennaConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl AntvizConfig {
    /// Load configuration from the default search path.
    ///
    /// Search order:
    /// 1. `ANTVIZ_CONFIG` environment variable
    /// 2. `./antviz.yaml`
    /// 3. `~/.config/antviz/config.yaml`
    /// 4. `/etc/antviz/config.yaml`
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from(&path);
            }
            return Err(ConfigError::NotFound(format!(
                "{} points to {}",
                CONFIG_ENV,
                path.display()
            )));
        }

        for path in &Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./antviz.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "antviz") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/antviz/config.yaml"));

        paths
    }

    /// Validate the configuration.
    ///
    /// The antenna section is not checked here: sessions clamp it before
    /// every evaluation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grids = [
            ("sweep_samples", self.grid.sweep_samples),
            ("mesh_theta_samples", self.grid.mesh_theta_samples),
            ("mesh_phi_samples", self.grid.mesh_phi_samples),
            ("directivity.samples", self.directivity.samples),
        ];
        for (name, n) in grids {
            if n < MIN_GRID_SAMPLES {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be >= {}",
                    name, MIN_GRID_SAMPLES
                )));
            }
        }

        if !(self.grid.pole_epsilon > 0.0 && self.grid.pole_epsilon <= MAX_POLE_EPSILON) {
            return Err(ConfigError::ValidationError(format!(
                "pole_epsilon must be in (0, {}]",
                MAX_POLE_EPSILON
            )));
        }

        let cutoff = self.directivity.pole_cutoff;
        if !(cutoff >= 0.0 && cutoff < std::f64::consts::FRAC_PI_4) {
            return Err(ConfigError::ValidationError(
                "directivity.pole_cutoff must be in [0, π/4)".to_string(),
            ));
        }

        if self.directivity.precision > 12 {
            return Err(ConfigError::ValidationError(
                "directivity.precision must be <= 12".to_string(),
            ));
        }

        Ok(())
    }

    /// Engine settings derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            grid: self.grid.policy(),
            integration: self.directivity,
        }
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            antenna: AntennaConfig::builder()
                .topology(crate::types::Topology::CollinearArray)
                .elements(4)
                .build(),
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
