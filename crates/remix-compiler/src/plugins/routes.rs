//! Route-module annotation.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use remix_routes::RouteManifest;

/// Absolute route module paths mapped to their route ids.
///
/// Route modules are entries whose exports the runtime reads by name, so
/// engines keep their side effects even under aggressive tree-shaking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteModuleIndex {
    modules: IndexMap<PathBuf, String>,
}

impl RouteModuleIndex {
    pub fn from_manifest(manifest: &RouteManifest, app_dir: &Path) -> Self {
        let modules = manifest
            .iter()
            .filter_map(|route| {
                let file = route.module_file.as_ref()?;
                Some((app_dir.join(file), route.id.clone()))
            })
            .collect();
        Self { modules }
    }

    pub fn route_id(&self, module: &Path) -> Option<&str> {
        self.modules.get(module).map(String::as_str)
    }

    pub fn is_route_module(&self, id: &str) -> bool {
        self.modules.contains_key(Path::new(id))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remix_routes::{RouteNode, RouteTree, flatten};

    #[test]
    fn indexes_routes_with_modules() {
        let tree = RouteTree::new(
            RouteNode::new("root", "/", "root.tsx")
                .with_children(vec![RouteNode::new("routes/about", "about", "routes/about.mdx")]),
        );
        let manifest = flatten(&tree).unwrap();
        let index = RouteModuleIndex::from_manifest(&manifest, Path::new("/app"));

        assert_eq!(index.len(), 2);
        assert_eq!(index.route_id(Path::new("/app/routes/about.mdx")), Some("routes/about"));
        assert!(index.is_route_module("/app/root.tsx"));
        assert!(!index.is_route_module("/app/components/nav.tsx"));
    }
}
