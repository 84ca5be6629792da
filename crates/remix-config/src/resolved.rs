//! The immutable configuration snapshot handed to the compiler.

use std::path::{Path, PathBuf};

use remix_routes::{
    RouteDefiner, RouteManifest, RouteSource, RouteTree, define_declared, flatten, resolve,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::loading::{load_config, resolve_root};
use crate::options::AppConfig;

/// Absolute directories, public path, port and routes for one build invocation.
///
/// Built once and only read afterwards; browser and server builds can share one
/// instance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    root_directory: PathBuf,
    app_directory: PathBuf,
    data_directory: PathBuf,
    browser_build_directory: PathBuf,
    server_build_directory: PathBuf,
    public_path: String,
    dev_server_port: u16,
    routes: RouteTree,
    route_manifest: RouteManifest,
    mdx: Option<Value>,
}

/// Loads and resolves the configuration of the project at `root`.
///
/// `root` falls back to `REMIX_ROOT`, then to the current directory.
pub async fn read_config(root: Option<&Path>) -> Result<ResolvedConfig> {
    resolve_config_with(root, None).await
}

/// Like [`read_config`], with an extra programmatic route source.
pub async fn resolve_config_with(
    root: Option<&Path>,
    source: Option<&dyn RouteSource>,
) -> Result<ResolvedConfig> {
    let root = resolve_root(root)?;
    let config = load_config(&root)?;
    ResolvedConfig::resolve(root, config, source).await
}

/// Appends a trailing `/` unless one is already present.
///
/// ```
/// use remix_config::normalize_public_path;
///
/// assert_eq!(normalize_public_path("/build"), "/build/");
/// assert_eq!(normalize_public_path("/build/"), "/build/");
/// ```
pub fn normalize_public_path(public_path: &str) -> String {
    if public_path.ends_with('/') {
        public_path.to_string()
    } else {
        format!("{public_path}/")
    }
}

impl ResolvedConfig {
    /// Resolves an already loaded [`AppConfig`] relative to `root`.
    ///
    /// Convention routes come first, then `[[routes]]` tables, then routes from
    /// `source`; all user routes hang directly off the root route.
    pub async fn resolve(
        root: PathBuf,
        config: AppConfig,
        source: Option<&dyn RouteSource>,
    ) -> Result<Self> {
        config.validate()?;

        let app_directory = root.join(&config.app_directory);
        let data_directory = root.join(&config.data_directory);

        let mut routes = resolve(&app_directory, &data_directory)?;
        routes.extend_top_level(define_declared(&config.routes)?);

        if let Some(source) = source {
            let mut definer = RouteDefiner::new();
            source
                .define_routes(&mut definer)
                .await
                .map_err(ConfigError::RouteSource)?;
            let defined = definer.finish();
            debug!(count = defined.len(), "added programmatic routes");
            routes.extend_top_level(defined);
        }

        let route_manifest = flatten(&routes)?;
        info!(
            root = %root.display(),
            routes = route_manifest.len(),
            "resolved config"
        );

        Ok(Self {
            browser_build_directory: root.join(&config.browser_build_directory),
            server_build_directory: root.join(&config.server_build_directory),
            public_path: normalize_public_path(&config.public_path),
            dev_server_port: config.dev_server_port,
            mdx: config.mdx,
            root_directory: root,
            app_directory,
            data_directory,
            routes,
            route_manifest,
        })
    }

    /// Reads `remix.config.toml` and the route directories again.
    ///
    /// Watch mode calls this before every rebuild so added, moved and deleted
    /// route files are picked up.
    pub async fn reload(&self, source: Option<&dyn RouteSource>) -> Result<ResolvedConfig> {
        let config = load_config(&self.root_directory)?;
        ResolvedConfig::resolve(self.root_directory.clone(), config, source).await
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn app_directory(&self) -> &Path {
        &self.app_directory
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    pub fn browser_build_directory(&self) -> &Path {
        &self.browser_build_directory
    }

    pub fn server_build_directory(&self) -> &Path {
        &self.server_build_directory
    }

    /// Always ends with `/`.
    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    pub fn dev_server_port(&self) -> u16 {
        self.dev_server_port
    }

    pub fn routes(&self) -> &RouteTree {
        &self.routes
    }

    pub fn route_manifest(&self) -> &RouteManifest {
        &self.route_manifest
    }

    pub fn mdx(&self) -> Option<&Value> {
        self.mdx.as_ref()
    }
}
