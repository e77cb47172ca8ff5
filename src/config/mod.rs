//! Configuration for cubegrid projects
//!
//! Provides types and loading for `cubegrid.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError, CONFIG_FILE};
pub use schema::*;
