//! This module contains various utility modules and helper functions.

pub mod log;

use crate::prelude::*;

/// The standard configuration bundled with the library.
pub const DEFAULT_CONFIG: &str = include_str!("../config.json");

/// Get the contents of a configuration file located in the configuration directory of classflow.
pub fn read_config_file(filename: &str) -> Result<serde_json::Value, Error> {
    let project_dirs = directories::ProjectDirs::from("", "", "classflow")
        .context("Could not discern location of configuration files.")?;
    let config_dir = project_dirs.config_dir();
    let config_path = config_dir.join(filename);
    let config_file =
        std::fs::read_to_string(config_path).context("Could not read configuration file")?;
    Ok(serde_json::from_str(&config_file)?)
}

/// Get the configuration to use when the user did not specify one.
///
/// A `config.json` in the configuration directory of classflow takes precedence over the bundled configuration.
pub fn get_default_config() -> Result<serde_json::Value, Error> {
    match read_config_file("config.json") {
        Ok(config) => Ok(config),
        Err(_) => serde_json::from_str(DEFAULT_CONFIG).context("Bundled configuration is invalid"),
    }
}
