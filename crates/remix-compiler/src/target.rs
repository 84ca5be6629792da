//! Build targets, modes, and the resolution conditions that follow from them.

use std::fmt;
use std::path::Path;

use remix_config::ResolvedConfig;
use serde::{Deserialize, Serialize};

/// Which bundle graph is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    Browser,
    Server,
}

impl BuildTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Server => "server",
        }
    }

    /// Basename of the entry module for this target, without extension.
    pub fn entry_name(&self) -> &'static str {
        match self {
            Self::Browser => "entry.client",
            Self::Server => "entry.server",
        }
    }

    /// File name of the asset manifest written after this target is built.
    pub fn manifest_file_name(&self) -> &'static str {
        match self {
            Self::Browser => "asset-manifest.json",
            Self::Server => "server-manifest.json",
        }
    }

    /// Directory the bundle for this target is written to by default.
    pub fn output_dir<'a>(&self, config: &'a ResolvedConfig) -> &'a Path {
        match self {
            Self::Browser => config.browser_build_directory(),
            Self::Server => config.server_build_directory(),
        }
    }

    pub fn conditions(&self) -> ExportConditions {
        match self {
            Self::Browser => ExportConditions::Browser,
            Self::Server => ExportConditions::Node,
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `{mode, target}` pair a build is produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildOptions {
    pub mode: BuildMode,
    pub target: BuildTarget,
}

impl BuildOptions {
    pub fn new(mode: BuildMode, target: BuildTarget) -> Self {
        Self { mode, target }
    }

    pub fn browser(mode: BuildMode) -> Self {
        Self::new(mode, BuildTarget::Browser)
    }

    pub fn server(mode: BuildMode) -> Self {
        Self::new(mode, BuildTarget::Server)
    }
}

impl fmt::Display for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.target, self.mode)
    }
}

/// Export conditions for package resolution.
///
/// Allocation only happens when converting to `Vec<String>` via `to_vec()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportConditions {
    /// `["node", "require", "import", "default"]`
    Node,
    /// `["browser", "import", "module", "default"]`
    Browser,
}

impl ExportConditions {
    pub fn as_slice(&self) -> &'static [&'static str] {
        match self {
            Self::Node => &["node", "require", "import", "default"],
            Self::Browser => &["browser", "import", "module", "default"],
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.as_slice().iter().map(|s| (*s).to_string()).collect()
    }

    pub fn contains(&self, condition: &str) -> bool {
        self.as_slice().contains(&condition)
    }

    /// `package.json` fields consulted when no export condition matches.
    pub fn main_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Node => &["main", "module"],
            Self::Browser => &["browser", "module", "main"],
        }
    }
}
