use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::options::AppConfig;

/// Name of the configuration file expected in the project root.
pub const CONFIG_FILE_NAME: &str = "remix.config.toml";

/// Prefix of environment variables that override config values (`REMIX_DEV_SERVER_PORT`).
pub const ENV_PREFIX: &str = "REMIX_";

/// Environment variable naming the project root when none is passed explicitly.
pub const ROOT_ENV_VAR: &str = "REMIX_ROOT";

/// Determines the project root.
///
/// Priority: explicit override > `REMIX_ROOT` > current directory. Relative
/// paths are made absolute against the current directory.
pub fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => match std::env::var_os(ROOT_ENV_VAR) {
            Some(root) if !root.is_empty() => PathBuf::from(root),
            _ => std::env::current_dir()?,
        },
    };

    if root.is_absolute() {
        Ok(root)
    } else {
        Ok(std::env::current_dir()?.join(root))
    }
}

/// Loads `<root>/remix.config.toml`.
///
/// Priority: environment variables > config file > defaults. The result has
/// legacy names folded in and is validated.
///
/// # Errors
///
/// Returns [`ConfigError::MissingConfigFile`] if the file does not exist.
pub fn load_config(root: &Path) -> Result<AppConfig> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Err(ConfigError::MissingConfigFile(root.to_path_buf()));
    }

    let mut config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .map(|key| snake_to_camel(key.as_str()).into()),
        )
        .extract()
        .map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: "Check remix.config.toml syntax and field types".to_string(),
        })?;

    config.apply_legacy_names();
    config.validate()?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// `DEV_SERVER_PORT` -> `devServerPort`, matching the file's key style.
fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.to_ascii_lowercase().chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
