#![cfg_attr(docsrs, feature(doc_cfg))]

//! # remix-compiler
//!
//! Turns a resolved Remix configuration into two independent bundle graphs:
//! one for the browser and one for the server.
//!
//! The crate decides what goes into each graph (entry and route inputs,
//! externals, tree-shaking hints, file naming, pipeline stages) and hands a
//! [`BundleRequest`] to a [`BundleEngine`]. With the `rolldown` feature the
//! engine is Rolldown; tests and other hosts can supply their own.
//!
//! ```no_run
//! # #[cfg(feature = "rolldown")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use remix_compiler::{BuildMode, BuildOptions, Compiler};
//!
//! let config = remix_config::read_config(None).await?;
//! let compiler = Compiler::rolldown();
//!
//! for options in [
//!     BuildOptions::browser(BuildMode::Production),
//!     BuildOptions::server(BuildMode::Production),
//! ] {
//!     let mut build = compiler.build(&config, options).await?;
//!     build.write_to_output_dir().await?;
//! }
//! # Ok(()) }
//! ```

pub mod build;
pub mod diagnostics;
pub mod engine;
pub mod entry;
pub mod output;
pub mod plugins;
pub mod policy;
pub mod target;
pub mod watch;

#[cfg(feature = "rolldown")]
#[cfg_attr(docsrs, doc(cfg(feature = "rolldown")))]
pub mod rolldown;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use build::{Build, Compiler, WriteReport};
pub use diagnostics::{BundleDiagnostic, DiagnosticKind};
pub use engine::{
    BundleEngine, BundleOutput, BundleRequest, EngineBundle, OutputAsset, OutputChunk,
};
pub use entry::{InputMap, build_input, find_entry};
pub use output::{AssetManifest, ManifestEntry};
pub use plugins::{MdxCompiler, Pipeline, PipelineError, StageKind};
pub use policy::{BundleWarning, TargetPolicy};
pub use target::{BuildMode, BuildOptions, BuildTarget, ExportConditions};
pub use watch::{WatchEvent, WatchHandle, WatchOptions};

#[cfg(feature = "rolldown")]
#[cfg_attr(docsrs, doc(cfg(feature = "rolldown")))]
pub use rolldown::RolldownEngine;

use std::path::PathBuf;

use remix_config::ConfigError;
use remix_routes::RouteResolutionError;

/// Error types for remix-compiler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration could not be loaded or its routes could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The target's entry module does not exist.
    #[error("Missing {} module in {}", .target.entry_name(), searched_dir(.searched))]
    EntryMissing {
        target: BuildTarget,
        searched: Vec<PathBuf>,
    },

    /// The bundling engine failed.
    #[error("Bundler error: {}", diagnostics::format_diagnostics(.0))]
    Bundle(Vec<BundleDiagnostic>),

    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(#[from] PipelineError),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    #[error("Write failure: {0}")]
    WriteFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Result type alias for remix-compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<RouteResolutionError> for Error {
    fn from(err: RouteResolutionError) -> Self {
        Error::Config(ConfigError::Routes(err))
    }
}

impl Error {
    /// Bundle error from an engine failure the adapter cannot inspect.
    pub fn from_engine(error: &dyn std::fmt::Debug) -> Self {
        Error::Bundle(vec![BundleDiagnostic::from_debug(error)])
    }
}

fn searched_dir(searched: &[PathBuf]) -> String {
    searched
        .first()
        .and_then(|path| path.parent())
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "the app directory".to_string())
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Config(ConfigError::Routes(_)) => "ROUTE_RESOLUTION_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::EntryMissing { .. } => "ENTRY_MISSING",
            Error::Bundle(_) => "BUNDLE_ERROR",
            Error::InvalidPipeline(_) => "INVALID_PIPELINE",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::Io(_) => "IO_ERROR",
            Error::Watch(_) => "WATCH_ERROR",
            Error::Manifest(_) => "MANIFEST_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Config(ConfigError::Routes(_)) => Some(Box::new(
                "Every file under app/routes must be a route module or a stylesheet next to one.",
            )),
            Error::Config(ConfigError::MissingConfigFile(_)) => Some(Box::new(
                "Create remix.config.toml in the project root or point REMIX_ROOT at the project.",
            )),
            Error::EntryMissing { target, searched } if searched.is_empty() => Some(Box::new(
                format!("Create {}.tsx in the app directory.", target.entry_name()),
            )),
            Error::EntryMissing { searched, .. } => Some(Box::new(format!(
                "Create one of:\n{}",
                searched
                    .iter()
                    .map(|path| format!("  {}", path.display()))
                    .collect::<Vec<_>>()
                    .join("\n")
            ))),
            Error::Bundle(diagnostics) => match diagnostics.as_slice() {
                [single] => single
                    .help
                    .as_ref()
                    .map(|help| Box::new(help.clone()) as Box<dyn std::fmt::Display>),
                [] => None,
                _ => Some(Box::new("Multiple bundler errors occurred. See details above.")),
            },
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{path}' must stay inside the build directory."
            ))),
            Error::WriteFailure(_) => Some(Box::new("Check disk space and permissions.")),
            _ => None,
        }
    }
}
