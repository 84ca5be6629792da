//! Error types for configuration loading and resolution.

use std::path::PathBuf;

use remix_routes::RouteResolutionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `remix.config.toml` does not exist in the project root.
    #[error("Missing remix.config.toml in {}\n\nHint: Create a remix.config.toml file or point REMIX_ROOT at your project", .0.display())]
    MissingConfigFile(PathBuf),

    /// A configuration value has the wrong type or an unusable value.
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    /// Route discovery or route definitions failed.
    #[error(transparent)]
    Routes(#[from] RouteResolutionError),

    /// The programmatic route source returned an error.
    #[error("route definitions failed: {0}")]
    RouteSource(#[source] anyhow::Error),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
