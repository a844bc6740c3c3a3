//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use corral::{CorralError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for CorralError {
    fn from(err: ConfigError) -> Self {
        CorralError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (corral/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - The loaded layout configuration is invalid
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CorralError> {
    let config = find_config(explicit_path)?;
    config.layout().validate()?;
    debug!(config:?; "Configuration loaded");
    Ok(config)
}

fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CorralError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("corral/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "corral", "corral") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, CorralError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AppConfig, CorralError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            [layout]
            width = 600.0
            group_domain = [1, 2]
            group_range = [100.0, 500.0]

            [style]
            flag_attribute = "selected"
            "#,
        )
        .unwrap();

        assert_eq!(config.layout().size().width(), 600.0);
        assert_eq!(config.layout().size().height(), 300.0);
        assert_eq!(config.layout().group_range(), &[100.0, 500.0]);
        assert_eq!(config.style().flag_attribute(), "selected");
        assert_eq!(config.layout().velocity_decay(), 0.4);
    }

    #[test]
    fn test_repulsion_falloff_names() {
        let config = parse_config("[layout]\nrepulsion_falloff = \"inverse-square\"\n").unwrap();
        assert_eq!(
            config.layout().repulsion_falloff(),
            corral::layout::RepulsionFalloff::InverseSquare
        );
    }

    #[test]
    fn test_malformed_config() {
        let err = parse_config("[layout\nwidth = 1").unwrap_err();
        assert!(matches!(err, CorralError::Config(msg) if msg.contains("TOML")));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CorralError::Config(msg) if msg.contains("Missing")));
    }
}
