//! Typed contents of `remix.config.toml`.

use std::path::{Path, PathBuf};

use remix_routes::DeclaredRoute;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::defaults::*;
use crate::error::{ConfigError, Result};

/// User configuration as written in `remix.config.toml`.
///
/// Directory values are relative to the project root unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Source directory holding `root.*`, `entry.*` and `routes/`.
    #[serde(default = "default_app_directory")]
    pub app_directory: PathBuf,

    /// Directory searched for route loader modules.
    #[serde(default = "default_data_directory")]
    pub data_directory: PathBuf,

    /// Older name for `dataDirectory`; takes precedence when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaders_directory: Option<PathBuf>,

    #[serde(default = "default_browser_build_directory")]
    pub browser_build_directory: PathBuf,

    #[serde(default = "default_server_build_directory")]
    pub server_build_directory: PathBuf,

    /// URL prefix the browser build is served from.
    #[serde(default = "default_public_path")]
    pub public_path: String,

    #[serde(default = "default_dev_server_port")]
    pub dev_server_port: u16,

    /// Routes declared in addition to the file-system conventions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<DeclaredRoute>,

    /// MDX options, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mdx: Option<Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_directory: default_app_directory(),
            data_directory: default_data_directory(),
            loaders_directory: None,
            browser_build_directory: default_browser_build_directory(),
            server_build_directory: default_server_build_directory(),
            public_path: default_public_path(),
            dev_server_port: default_dev_server_port(),
            routes: Vec::new(),
            mdx: None,
        }
    }
}

impl AppConfig {
    /// Folds `loadersDirectory` into `dataDirectory`.
    pub fn apply_legacy_names(&mut self) {
        if let Some(dir) = self.loaders_directory.take() {
            tracing::debug!(dir = %dir.display(), "using loadersDirectory as dataDirectory");
            self.data_directory = dir;
        }
    }

    /// Checks values for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.dev_server_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "devServerPort".to_string(),
                value: "0".to_string(),
                hint: "Use a port between 1 and 65535".to_string(),
            });
        }

        let directories: [(&str, &Path); 4] = [
            ("appDirectory", self.app_directory.as_path()),
            ("dataDirectory", self.data_directory.as_path()),
            ("browserBuildDirectory", self.browser_build_directory.as_path()),
            ("serverBuildDirectory", self.server_build_directory.as_path()),
        ];
        for (field, dir) in directories {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: String::new(),
                    hint: "Directory paths cannot be empty".to_string(),
                });
            }
        }

        if self.public_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "publicPath".to_string(),
                value: self.public_path.clone(),
                hint: "Use a URL prefix such as \"/build/\"".to_string(),
            });
        }

        for route in &self.routes {
            route.validate()?;
        }

        Ok(())
    }
}
