//! # remix-config
//!
//! Loads `remix.config.toml`, applies defaults and resolves everything the
//! compiler needs into one immutable [`ResolvedConfig`]:
//!
//! - absolute root, app, data and build directories
//! - the trailing-slash normalized public path
//! - the route tree (file-system conventions plus declared and programmatic routes)
//! - the flat route manifest
//!
//! ```no_run
//! # async fn run() -> remix_config::Result<()> {
//! let config = remix_config::read_config(None).await?;
//! println!("{} routes", config.route_manifest().len());
//! # Ok(()) }
//! ```

pub mod defaults;
pub mod error;
pub mod loading;
pub mod options;
pub mod resolved;

pub use error::{ConfigError, Result};
pub use loading::{CONFIG_FILE_NAME, ENV_PREFIX, ROOT_ENV_VAR, load_config, resolve_root};
pub use options::AppConfig;
pub use resolved::{ResolvedConfig, normalize_public_path, read_config, resolve_config_with};

pub use remix_routes::{RouteDefiner, RouteSource};
