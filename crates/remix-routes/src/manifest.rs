//! Flat, id-keyed route manifest.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteResolutionError};
use crate::route::{RouteNode, RouteTree};

/// A route record without its children; nesting is carried by `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRoute {
    pub id: String,
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl From<&RouteNode> for ManifestRoute {
    fn from(node: &RouteNode) -> Self {
        Self {
            id: node.id.clone(),
            path: node.path.clone(),
            module_file: node.module_file.clone(),
            styles_file: node.styles_file.clone(),
            loader_file: node.loader_file.clone(),
            parent_id: node.parent_id.clone(),
        }
    }
}

impl ManifestRoute {
    fn to_node(&self) -> RouteNode {
        RouteNode {
            id: self.id.clone(),
            path: self.path.clone(),
            module_file: self.module_file.clone(),
            styles_file: self.styles_file.clone(),
            loader_file: self.loader_file.clone(),
            parent_id: self.parent_id.clone(),
            children: Vec::new(),
        }
    }
}

/// Routes keyed by id, in depth-first order of the tree they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteManifest {
    root_id: String,
    routes: IndexMap<String, ManifestRoute>,
}

/// Flattens a route tree into a manifest.
///
/// Fails with [`RouteResolutionError::DuplicateRouteId`] if two routes share an id.
pub fn flatten(tree: &RouteTree) -> Result<RouteManifest> {
    let routes = tree
        .iter()
        .try_fold(IndexMap::new(), |mut routes, node| {
            if routes.contains_key(&node.id) {
                return Err(RouteResolutionError::DuplicateRouteId(node.id.clone()));
            }
            routes.insert(node.id.clone(), ManifestRoute::from(node));
            Ok(routes)
        })?;

    Ok(RouteManifest {
        root_id: tree.root_id().to_string(),
        routes,
    })
}

impl RouteManifest {
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn root(&self) -> Option<&ManifestRoute> {
        self.routes.get(&self.root_id)
    }

    pub fn get(&self, id: &str) -> Option<&ManifestRoute> {
        self.routes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestRoute> {
        self.routes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Direct children of `id`, in manifest order.
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ManifestRoute> + 'a {
        self.routes
            .values()
            .filter(move |route| route.parent_id.as_deref() == Some(id))
    }

    /// Rebuilds the nested tree from `parent_id` edges.
    ///
    /// Every non-root route must name a parent present in the manifest and be
    /// reachable from the root.
    pub fn to_tree(&self) -> Result<RouteTree> {
        let root = self
            .root()
            .ok_or_else(|| RouteResolutionError::Unreachable(self.root_id.clone()))?;

        for route in self.iter().filter(|route| route.id != self.root_id) {
            match &route.parent_id {
                Some(parent_id) if self.contains(parent_id) => {}
                Some(parent_id) => {
                    return Err(RouteResolutionError::MissingParent {
                        id: route.id.clone(),
                        parent_id: parent_id.clone(),
                    });
                }
                None => return Err(RouteResolutionError::Unreachable(route.id.clone())),
            }
        }

        let mut visited = 0;
        let root = self.build_subtree(root, &mut visited);
        if visited != self.len() {
            let orphan = self
                .iter()
                .find(|route| !self.reaches_root(route))
                .map(|route| route.id.clone())
                .unwrap_or_default();
            return Err(RouteResolutionError::Unreachable(orphan));
        }

        Ok(RouteTree::new(root))
    }

    fn build_subtree(&self, route: &ManifestRoute, visited: &mut usize) -> RouteNode {
        *visited += 1;
        let mut node = route.to_node();
        node.children = self
            .children_of(&route.id)
            .filter(|child| child.id != self.root_id)
            .map(|child| self.build_subtree(child, visited))
            .collect();
        node
    }

    /// Follows parent links upward; false on a cycle or a dead end.
    fn reaches_root(&self, route: &ManifestRoute) -> bool {
        let mut current = route;
        for _ in 0..=self.len() {
            if current.id == self.root_id {
                return true;
            }
            match current.parent_id.as_deref().and_then(|id| self.get(id)) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }
}

impl<'a> IntoIterator for &'a RouteManifest {
    type Item = &'a ManifestRoute;
    type IntoIter = indexmap::map::Values<'a, String, ManifestRoute>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::ROOT_ROUTE_ID;

    fn tree() -> RouteTree {
        RouteTree::new(RouteNode::new(ROOT_ROUTE_ID, "/", "root.tsx").with_children(vec![
            RouteNode::new("routes/gists", "gists", "routes/gists.tsx")
                .with_styles("routes/gists.css")
                .with_children(vec![RouteNode::new(
                    "routes/gists/$username",
                    "gists/:username",
                    "routes/gists/$username.tsx",
                )]),
            RouteNode::new("routes/index", "", "routes/index.tsx"),
        ]))
    }

    #[test]
    fn flatten_keeps_depth_first_order() {
        let manifest = flatten(&tree()).unwrap();
        let ids: Vec<_> = manifest.ids().collect();
        assert_eq!(
            ids,
            ["root", "routes/gists", "routes/gists/$username", "routes/index"]
        );
        assert_eq!(manifest.root_id(), ROOT_ROUTE_ID);
        assert_eq!(
            manifest.get("routes/gists/$username").unwrap().parent_id.as_deref(),
            Some("routes/gists")
        );
    }

    #[test]
    fn flatten_rejects_duplicate_ids() {
        let tree = RouteTree::new(RouteNode::new(ROOT_ROUTE_ID, "/", "root.tsx").with_children(vec![
            RouteNode::new("about", "about", "routes/about.tsx"),
            RouteNode::new("about", "about-us", "pages/about.tsx"),
        ]));
        assert!(matches!(
            flatten(&tree),
            Err(RouteResolutionError::DuplicateRouteId(id)) if id == "about"
        ));
    }

    #[test]
    fn to_tree_round_trips() {
        let original = tree();
        let rebuilt = flatten(&original).unwrap().to_tree().unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn children_of_lists_direct_children() {
        let manifest = flatten(&tree()).unwrap();
        let children: Vec<_> = manifest
            .children_of(ROOT_ROUTE_ID)
            .map(|route| route.id.as_str())
            .collect();
        assert_eq!(children, ["routes/gists", "routes/index"]);
    }

    #[test]
    fn to_tree_reports_missing_parent() {
        let mut manifest = flatten(&tree()).unwrap();
        manifest
            .routes
            .get_mut("routes/index")
            .unwrap()
            .parent_id = Some("routes/missing".to_string());
        assert!(matches!(
            manifest.to_tree(),
            Err(RouteResolutionError::MissingParent { id, .. }) if id == "routes/index"
        ));
    }

    #[test]
    fn to_tree_reports_cycles_as_unreachable() {
        let mut manifest = flatten(&tree()).unwrap();
        manifest.routes.get_mut("routes/gists").unwrap().parent_id =
            Some("routes/gists/$username".to_string());
        assert!(matches!(
            manifest.to_tree(),
            Err(RouteResolutionError::Unreachable(_))
        ));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let manifest = flatten(&tree()).unwrap();
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["rootId"], "root");
        assert_eq!(json["routes"]["routes/gists"]["stylesFile"], "routes/gists.css");
        assert_eq!(json["routes"]["routes/gists"]["parentId"], "root");
    }
}
