//! Simulation configuration file support.
//!
//! This module reads the upgrade-cycle policy, fleet shape and catalog
//! location from an `escalator.toml` file. Every section and key is optional.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::algorithms::UpgradeCyclePolicy;
use crate::core::{
    EnvironmentGroup, MaintenanceWindow, ReleaseCatalog, SimulationError, SimulationResult,
};
use crate::io::CatalogLoader;
use crate::services::build_fleet;

const CONFIG_FILE_NAME: &str = "escalator.toml";

/// Simulation configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub upgrade_cycle: UpgradeCycleSettings,
    #[serde(default)]
    pub fleet: FleetSettings,
}

/// Where the release catalog comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// CSV or JSON catalog; the bundled Kubernetes catalog when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Upgrade-cycle policy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeCycleSettings {
    #[serde(default = "default_ignore_days")]
    pub ignore_days: u32,
    #[serde(default = "default_step_days")]
    pub plan_days: u32,
    #[serde(default = "default_step_days")]
    pub prework_days: u32,
    #[serde(default = "default_step_days")]
    pub upgrade_days: u32,
    #[serde(default = "default_failure_percentage")]
    pub upgrade_failure_percentage: f64,
    #[serde(default)]
    pub maintenance_window: MaintenanceWindow,
    /// Fixed seed for failure sampling
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Shape of the simulated fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSettings {
    #[serde(default = "default_fleet_dimension")]
    pub groups: usize,
    #[serde(default = "default_fleet_dimension")]
    pub environments_per_group: usize,
}

fn default_ignore_days() -> u32 {
    14
}

fn default_step_days() -> u32 {
    1
}

fn default_failure_percentage() -> f64 {
    1.0
}

fn default_fleet_dimension() -> usize {
    3
}

impl Default for UpgradeCycleSettings {
    fn default() -> Self {
        Self {
            ignore_days: default_ignore_days(),
            plan_days: default_step_days(),
            prework_days: default_step_days(),
            upgrade_days: default_step_days(),
            upgrade_failure_percentage: default_failure_percentage(),
            maintenance_window: MaintenanceWindow::default(),
            seed: None,
        }
    }
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            groups: default_fleet_dimension(),
            environments_per_group: default_fleet_dimension(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative catalog path is resolved against the directory holding the
    /// configuration file.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if the file cannot be read, parsed or validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SimulationError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if let (Some(catalog_path), Some(base)) = (config.catalog.path.as_mut(), path.parent()) {
            if catalog_path.is_relative() {
                *catalog_path = base.join(&*catalog_path);
            }
        }

        info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> SimulationResult<Self> {
        let config: SimulationConfig = toml::from_str(content).map_err(|e| {
            SimulationError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `escalator.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to the defaults when none exists.
    pub fn from_default_location() -> SimulationResult<Self> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            Path::new("rust_backend").join(CONFIG_FILE_NAME),
            Path::new("..").join(CONFIG_FILE_NAME),
        ];

        match search_paths.iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(path),
            None => {
                warn!(
                    "No {} found in standard locations, using defaults",
                    CONFIG_FILE_NAME
                );
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> SimulationResult<()> {
        self.upgrade_cycle_policy().validate()?;
        if self.fleet.groups == 0 || self.fleet.environments_per_group == 0 {
            return Err(SimulationError::ConfigurationError(format!(
                "Fleet needs at least one group and one environment per group, got {} x {}",
                self.fleet.groups, self.fleet.environments_per_group
            )));
        }
        Ok(())
    }

    pub fn upgrade_cycle_policy(&self) -> UpgradeCyclePolicy {
        let settings = &self.upgrade_cycle;
        UpgradeCyclePolicy {
            ignore_days: settings.ignore_days,
            plan_days: settings.plan_days,
            prework_days: settings.prework_days,
            upgrade_days: settings.upgrade_days,
            upgrade_failure_percentage: settings.upgrade_failure_percentage,
            maintenance_window: settings.maintenance_window,
        }
    }

    /// Uniform fleet described by the `[fleet]` section.
    pub fn fleet(&self) -> SimulationResult<Vec<EnvironmentGroup>> {
        build_fleet(self.fleet.groups, self.fleet.environments_per_group)
    }

    /// Seeded generator when `seed` is set, entropy-seeded otherwise.
    pub fn rng(&self) -> StdRng {
        match self.upgrade_cycle.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// The configured catalog, or the bundled Kubernetes catalog.
    pub fn load_catalog(&self) -> SimulationResult<ReleaseCatalog> {
        match &self.catalog.path {
            Some(path) => CatalogLoader::load_from_file(path),
            None => CatalogLoader::load_default(),
        }
    }
}
