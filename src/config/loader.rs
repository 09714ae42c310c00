//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::PlannerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable selecting the listening port.
pub const PORT_VAR: &str = "PORT";

/// Environment variable carrying the maps provider credential.
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply process environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<PlannerConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => PlannerConfig::default(),
    };

    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<PlannerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay environment-sourced values on top of file/default values.
///
/// `lookup` abstracts the environment so callers (and tests) can supply it.
pub fn apply_env_overrides<F>(
    mut config: PlannerConfig,
    lookup: F,
) -> Result<PlannerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(PORT_VAR) {
        config.listener.port = port.trim().parse().map_err(|e| ConfigError::Env {
            var: PORT_VAR,
            message: format!("'{}' is not a port number: {}", port, e),
        })?;
    }

    if let Some(key) = lookup(API_KEY_VAR) {
        if !key.trim().is_empty() {
            config.maps.api_key = key.trim().to_string();
        }
    }

    Ok(config)
}
