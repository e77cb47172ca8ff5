//! Configuration loading and discovery for `cubegrid.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::GridConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "cubegrid.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse cubegrid.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the palette (built-in name)
    pub palette: Option<String>,
    /// Override PNG export scale
    pub scale: Option<u32>,
    /// Override guide tile size
    pub tile_size: Option<usize>,
    /// Override guide super-tile size
    pub super_tile_size: Option<usize>,
    /// Override the publish directory
    pub publish_dir: Option<PathBuf>,
}

/// Find `cubegrid.toml` by walking up from the current working directory,
/// falling back to `$XDG_CONFIG_HOME/cubegrid/cubegrid.toml`.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find the config in the XDG config directory (or `~/.config`).
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("cubegrid").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find `cubegrid.toml` by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from `path`, or from the discovered config file.
/// With no file anywhere, the defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<GridConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            log::debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(GridConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<GridConfig, ConfigError> {
    log::info!("loading config from {}", path.display());
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<GridConfig, ConfigError> {
    let config: GridConfig = toml::from_str(contents)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &GridConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Merge CLI overrides into a configuration and re-validate it.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(
    config: &mut GridConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(ref palette) = overrides.palette {
        config.palette.builtin = palette.clone();
        config.palette.colors.clear();
    }
    if let Some(scale) = overrides.scale {
        config.export.scale = scale;
    }
    if let Some(tile_size) = overrides.tile_size {
        config.guide.tile_size = tile_size;
    }
    if let Some(super_tile_size) = overrides.super_tile_size {
        config.guide.super_tile_size = super_tile_size;
    }
    if let Some(ref dir) = overrides.publish_dir {
        config.publish.dir = dir.clone();
    }
    check(config)
}
