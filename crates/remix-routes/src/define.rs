//! Programmatic and declarative route definitions.
//!
//! Routes defined here are appended under the root route next to the routes
//! discovered from the file system.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteResolutionError};
use crate::files::{strip_extension, to_slash};
use crate::route::RouteNode;

/// Optional per-route settings for [`RouteDefiner`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Explicit id; defaults to the module file without its extension.
    pub id: Option<String>,
    /// Stylesheet relative to the app directory.
    pub styles_file: Option<PathBuf>,
}

impl RouteOptions {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn styles(mut self, styles_file: impl Into<PathBuf>) -> Self {
        self.styles_file = Some(styles_file.into());
        self
    }
}

/// Mutable builder used to declare child routes.
#[derive(Debug, Default)]
pub struct RouteDefiner {
    parent_id: Option<String>,
    routes: Vec<RouteNode>,
}

impl RouteDefiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a leaf route.
    pub fn route(&mut self, path: impl Into<String>, file: impl AsRef<Path>) -> &mut Self {
        self.route_with(path, file, RouteOptions::default())
    }

    /// Declares a leaf route with options.
    pub fn route_with(
        &mut self,
        path: impl Into<String>,
        file: impl AsRef<Path>,
        options: RouteOptions,
    ) -> &mut Self {
        let node = self.node(path.into(), file.as_ref(), options);
        self.routes.push(node);
        self
    }

    /// Declares a route and its children.
    pub fn nested<F>(
        &mut self,
        path: impl Into<String>,
        file: impl AsRef<Path>,
        options: RouteOptions,
        children: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut RouteDefiner),
    {
        let mut node = self.node(path.into(), file.as_ref(), options);
        let mut child_definer = RouteDefiner {
            parent_id: Some(node.id.clone()),
            routes: Vec::new(),
        };
        children(&mut child_definer);
        node.children = child_definer.finish();
        self.routes.push(node);
        self
    }

    /// Routes declared so far at this level.
    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    pub fn finish(self) -> Vec<RouteNode> {
        self.routes
    }

    fn node(&self, path: String, file: &Path, options: RouteOptions) -> RouteNode {
        let id = options.id.unwrap_or_else(|| route_id_for_file(file));
        RouteNode {
            id,
            path,
            module_file: Some(file.to_path_buf()),
            styles_file: options.styles_file,
            loader_file: None,
            parent_id: self.parent_id.clone(),
            children: Vec::new(),
        }
    }
}

/// Builds a list of top-level routes through a [`RouteDefiner`].
///
/// ```
/// use remix_routes::{RouteOptions, define_routes};
///
/// let routes = define_routes(|route| {
///     route.route("/", "pages/home.tsx");
///     route.nested("admin", "pages/admin.tsx", RouteOptions::default(), |route| {
///         route.route("users", "pages/admin/users.tsx");
///     });
/// });
///
/// assert_eq!(routes.len(), 2);
/// assert_eq!(routes[1].children[0].id, "pages/admin/users");
/// assert_eq!(routes[1].children[0].parent_id.as_deref(), Some("pages/admin"));
/// ```
pub fn define_routes<F>(define: F) -> Vec<RouteNode>
where
    F: FnOnce(&mut RouteDefiner),
{
    let mut definer = RouteDefiner::new();
    define(&mut definer);
    definer.finish()
}

/// Default id for a route module: its path without the final extension.
pub fn route_id_for_file(file: &Path) -> String {
    strip_extension(&to_slash(file)).to_string()
}

/// Asynchronous source of user-defined routes.
///
/// This is the programmatic counterpart of `[[routes]]` tables in the config file.
#[async_trait]
pub trait RouteSource: Send + Sync {
    async fn define_routes(&self, route: &mut RouteDefiner) -> anyhow::Result<()>;
}

/// A route declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredRoute {
    pub path: String,

    /// Module file relative to the app directory.
    pub file: PathBuf,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, alias = "stylesFile")]
    pub styles: Option<PathBuf>,

    #[serde(default)]
    pub children: Vec<DeclaredRoute>,
}

impl DeclaredRoute {
    /// Rejects entries without a module file.
    pub fn validate(&self) -> Result<()> {
        if self.file.as_os_str().is_empty() {
            return Err(RouteResolutionError::InvalidDefinition(format!(
                "route with path \"{}\" has no module file",
                self.path
            )));
        }
        self.children.iter().try_for_each(DeclaredRoute::validate)
    }

    /// Declares this route (and its children) on `route`.
    pub fn define(&self, route: &mut RouteDefiner) {
        let options = RouteOptions {
            id: self.id.clone(),
            styles_file: self.styles.clone(),
        };
        if self.children.is_empty() {
            route.route_with(self.path.clone(), &self.file, options);
        } else {
            route.nested(self.path.clone(), &self.file, options, |route| {
                for child in &self.children {
                    child.define(route);
                }
            });
        }
    }
}

/// Builds top-level routes from declared route tables.
pub fn define_declared(declared: &[DeclaredRoute]) -> Result<Vec<RouteNode>> {
    declared.iter().try_for_each(DeclaredRoute::validate)?;
    Ok(define_routes(|route| {
        for entry in declared {
            entry.define(route);
        }
    }))
}
