//! Application configuration.
//!
//! A small YAML file supplies defaults for any propagation parameter a
//! request leaves out:
//!
//! ```yaml
//! defaults:
//!   activation: tanh
//!   threshold: 0.0001
//!   maxIterations: 500
//!   baselinePolicy: zeroNonDrivers
//! ```
//!
//! Priority: request field > config file > built-in default.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use fcm_core::Activation;
use fcm_project::BaselinePolicy;
use fcm_project::validate::validate_parameters;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "FCM_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationDefaults {
    pub activation: Activation,
    pub threshold: f64,
    pub max_iterations: usize,
    pub baseline_policy: BaselinePolicy,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            activation: Activation::Sigmoid,
            threshold: 0.001,
            max_iterations: 100,
            baseline_policy: BaselinePolicy::StoredDefaults,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: SimulationDefaults,
}

impl AppConfig {
    /// Config from `path`, else from `$FCM_CONFIG`, else built-in defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        Self::load_with_env(path, std::env::var_os(CONFIG_ENV))
    }

    fn load_with_env(path: Option<&Path>, env: Option<OsString>) -> AppResult<Self> {
        let path = match (path, env) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(p)) if !p.is_empty() => PathBuf::from(p),
            _ => {
                tracing::debug!("no config file given, using built-in defaults");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| AppError::ConfigRead {
            path: path.clone(),
            source: e,
        })?;
        let config = Self::from_yaml(&contents).map_err(|message| AppError::Config {
            path: path.clone(),
            message,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and check a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, String> {
        let config: AppConfig = serde_yaml::from_str(contents).map_err(|e| e.to_string())?;
        let d = &config.defaults;
        let max_iterations = i64::try_from(d.max_iterations)
            .map_err(|_| format!("maxIterations {} is out of range", d.max_iterations))?;
        validate_parameters(None, Some(d.threshold), Some(max_iterations))
            .map_err(|e| e.to_string())?;
        Ok(config)
    }
}
