//! File-system convention resolver.
//!
//! Every file under `<app>/routes` becomes a route. Ids are the file paths
//! (relative to the app directory) without their extension, nesting is inferred
//! from the ids, and the whole tree hangs off a single root route backed by
//! `<app>/root.*`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, RouteResolutionError};
use crate::files::{
    DATA_EXTENSIONS, ENTRY_EXTENSIONS, STYLES_EXTENSIONS, find_with_extensions, is_module_file,
    is_styles_file, strip_extension, to_slash,
};
use crate::parent::{LongestPrefix, ParentStrategy};
use crate::path::create_route_path;
use crate::route::{ROOT_ROUTE_ID, RouteNode, RouteTree};

/// Name of the routes directory inside the app directory.
pub const ROUTES_DIR: &str = "routes";

/// Loader file name used by the root route.
const GLOBAL_LOADER: &str = "global";

/// Resolves routes with the default [`LongestPrefix`] parent strategy.
pub fn resolve(app_dir: &Path, data_dir: &Path) -> Result<RouteTree> {
    ConventionResolver::default().resolve(app_dir, data_dir)
}

/// Files found for one route id.
#[derive(Debug, Default)]
struct Discovered {
    module_file: Option<PathBuf>,
    styles_file: Option<PathBuf>,
}

/// Builds a [`RouteTree`] from the routes directory.
pub struct ConventionResolver {
    strategy: Box<dyn ParentStrategy>,
}

impl Default for ConventionResolver {
    fn default() -> Self {
        Self::with_strategy(Box::new(LongestPrefix))
    }
}

impl std::fmt::Debug for ConventionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConventionResolver").finish_non_exhaustive()
    }
}

impl ConventionResolver {
    pub fn with_strategy(strategy: Box<dyn ParentStrategy>) -> Self {
        Self { strategy }
    }

    /// Scans `app_dir` and returns the route tree.
    ///
    /// Loader files are looked up in `data_dir`; a missing data directory simply
    /// yields routes without loaders.
    ///
    /// # Errors
    ///
    /// - [`RouteResolutionError::MissingRootModule`] when `root.*` is absent
    /// - [`RouteResolutionError::UnrecognizedFile`] for files that are neither modules nor styles
    /// - [`RouteResolutionError::StylesWithoutModule`] for a stylesheet with no module
    /// - [`RouteResolutionError::ConflictingModules`] when two modules share an id
    pub fn resolve(&self, app_dir: &Path, data_dir: &Path) -> Result<RouteTree> {
        let root_file = find_with_extensions(app_dir, ROOT_ROUTE_ID, ENTRY_EXTENSIONS).ok_or_else(
            || RouteResolutionError::MissingRootModule {
                dir: app_dir.to_path_buf(),
            },
        )?;

        let discovered = scan_routes(app_dir)?;
        let ids: Vec<String> = discovered.keys().cloned().collect();

        let mut children: HashMap<Option<&str>, Vec<&str>> = HashMap::new();
        for id in &ids {
            let parent = self.strategy.find_parent(id, &ids);
            children.entry(parent).or_default().push(id.as_str());
        }

        let builder = NodeBuilder {
            discovered: &discovered,
            children: &children,
            data_dir,
        };
        let top_level = builder.build_children(None);

        let mut root = RouteNode {
            id: ROOT_ROUTE_ID.to_string(),
            path: "/".to_string(),
            module_file: Some(relative_to(&root_file, app_dir)),
            styles_file: None,
            loader_file: find_loader(data_dir, GLOBAL_LOADER),
            parent_id: None,
            children: top_level,
        };
        if let Some(styles) = find_with_extensions(app_dir, ROOT_ROUTE_ID, STYLES_EXTENSIONS) {
            root.styles_file = Some(relative_to(&styles, app_dir));
        }

        let tree = RouteTree::new(root);
        debug!(
            app_dir = %app_dir.display(),
            routes = tree.route_count(),
            "resolved convention routes"
        );
        Ok(tree)
    }
}

struct NodeBuilder<'a> {
    discovered: &'a BTreeMap<String, Discovered>,
    children: &'a HashMap<Option<&'a str>, Vec<&'a str>>,
    data_dir: &'a Path,
}

impl<'a> NodeBuilder<'a> {
    fn build_children(&self, parent: Option<&'a str>) -> Vec<RouteNode> {
        self.children
            .get(&parent)
            .map(|ids| ids.iter().map(|&id| self.build_node(id)).collect())
            .unwrap_or_default()
    }

    fn build_node(&self, id: &'a str) -> RouteNode {
        let files = &self.discovered[id];
        let below_routes = id
            .strip_prefix(ROUTES_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(id);

        RouteNode {
            id: id.to_string(),
            path: create_route_path(below_routes),
            module_file: files.module_file.clone(),
            styles_file: files.styles_file.clone(),
            loader_file: find_loader(self.data_dir, id),
            parent_id: None,
            children: self.build_children(Some(id)),
        }
    }
}

/// Walks `<app>/routes` and groups module and styles files by route id.
fn scan_routes(app_dir: &Path) -> Result<BTreeMap<String, Discovered>> {
    let routes_dir = app_dir.join(ROUTES_DIR);
    let mut discovered: BTreeMap<String, Discovered> = BTreeMap::new();
    if !routes_dir.is_dir() {
        debug!(dir = %routes_dir.display(), "no routes directory");
        return Ok(discovered);
    }

    let walker = WalkDir::new(&routes_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|source| RouteResolutionError::Scan {
            path: routes_dir.clone(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file = relative_to(entry.path(), app_dir);
        let slashed = to_slash(&file);
        let id = strip_extension(&slashed).to_string();
        let slot = discovered.entry(id.clone()).or_default();

        if is_module_file(&file) {
            if let Some(first) = &slot.module_file {
                return Err(RouteResolutionError::ConflictingModules {
                    id,
                    first: first.clone(),
                    second: file,
                });
            }
            slot.module_file = Some(file);
        } else if is_styles_file(&file) {
            slot.styles_file = Some(file);
        } else {
            return Err(RouteResolutionError::UnrecognizedFile { path: file });
        }
    }

    if let Some((id, files)) = discovered
        .iter()
        .find(|(_, files)| files.module_file.is_none())
    {
        return Err(RouteResolutionError::StylesWithoutModule {
            id: id.clone(),
            styles_file: files.styles_file.clone().unwrap_or_default(),
        });
    }

    debug!(dir = %routes_dir.display(), count = discovered.len(), "scanned route files");
    Ok(discovered)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn find_loader(data_dir: &Path, id: &str) -> Option<PathBuf> {
    find_with_extensions(data_dir, id, DATA_EXTENSIONS).map(|file| relative_to(&file, data_dir))
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn root_only_app_resolves_to_single_route() {
        let app = TempDir::new().unwrap();
        touch(app.path(), "root.jsx");

        let tree = resolve(app.path(), &app.path().join("data")).unwrap();
        assert_eq!(tree.route_count(), 1);
        assert_eq!(tree.root().module_file.as_deref(), Some(Path::new("root.jsx")));
        assert_eq!(tree.root().path, "/");
    }

    #[test]
    fn hidden_files_are_skipped() {
        let app = TempDir::new().unwrap();
        touch(app.path(), "root.tsx");
        touch(app.path(), "routes/.DS_Store");
        touch(app.path(), "routes/.drafts/wip.tsx");
        touch(app.path(), "routes/about.tsx");

        let tree = resolve(app.path(), app.path()).unwrap();
        let ids: Vec<_> = tree.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, ["root", "routes/about"]);
    }

    #[test]
    fn two_modules_for_one_id_conflict() {
        let app = TempDir::new().unwrap();
        touch(app.path(), "root.tsx");
        touch(app.path(), "routes/gists.mdx");
        touch(app.path(), "routes/gists.tsx");

        let err = resolve(app.path(), app.path()).unwrap_err();
        assert!(matches!(
            err,
            RouteResolutionError::ConflictingModules { ref id, .. } if id == "routes/gists"
        ));
    }

    #[test]
    fn custom_strategy_is_used_for_nesting() {
        struct Flat;
        impl ParentStrategy for Flat {
            fn find_parent<'a>(&self, _id: &str, _candidates: &'a [String]) -> Option<&'a str> {
                None
            }
        }

        let app = TempDir::new().unwrap();
        touch(app.path(), "root.tsx");
        touch(app.path(), "routes/gists.tsx");
        touch(app.path(), "routes/gists/$username.tsx");

        let tree = ConventionResolver::with_strategy(Box::new(Flat))
            .resolve(app.path(), app.path())
            .unwrap();
        assert_eq!(tree.top_level().len(), 2);
        assert!(tree.top_level().iter().all(|node| node.children.is_empty()));
    }
}
