//! Route definition model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Id of the synthetic root route that owns every other route.
pub const ROOT_ROUTE_ID: &str = "root";

/// One node of the hierarchical route tree.
///
/// `parent_id` is a plain back-reference by id; ownership runs through `children` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    /// Unique id, derived from the module path without its extension.
    pub id: String,

    /// URL path pattern (`gists/:username`); empty for index routes.
    pub path: String,

    /// Module file relative to the app directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_file: Option<PathBuf>,

    /// Stylesheet relative to the app directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles_file: Option<PathBuf>,

    /// Data loader relative to the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// Creates a route with a module file and no children.
    pub fn new(id: impl Into<String>, path: impl Into<String>, module_file: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            module_file: Some(module_file.into()),
            styles_file: None,
            loader_file: None,
            parent_id: None,
            children: Vec::new(),
        }
    }

    pub fn with_styles(mut self, styles_file: impl Into<PathBuf>) -> Self {
        self.styles_file = Some(styles_file.into());
        self
    }

    pub fn with_loader(mut self, loader_file: impl Into<PathBuf>) -> Self {
        self.loader_file = Some(loader_file.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of routes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(RouteNode::count).sum::<usize>()
    }

    /// Rewrites every descendant's `parent_id` so it names its actual owner.
    fn link_children(&mut self) {
        for child in &mut self.children {
            child.parent_id = Some(self.id.clone());
            child.link_children();
        }
    }
}

/// A complete route tree with an explicit root.
///
/// The root is held in its own field rather than identified by id ordering, and
/// every `parent_id` in the tree is kept consistent with the `children` edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RouteNode", into = "RouteNode")]
pub struct RouteTree {
    root: RouteNode,
}

impl RouteTree {
    /// Wraps `root` as the tree root, clearing its parent and relinking descendants.
    pub fn new(mut root: RouteNode) -> Self {
        root.parent_id = None;
        root.link_children();
        Self { root }
    }

    pub fn root(&self) -> &RouteNode {
        &self.root
    }

    pub fn root_id(&self) -> &str {
        &self.root.id
    }

    /// Routes owned directly by the root.
    pub fn top_level(&self) -> &[RouteNode] {
        &self.root.children
    }

    /// Appends routes under the root, after the existing top-level routes.
    pub fn extend_top_level(&mut self, routes: impl IntoIterator<Item = RouteNode>) {
        self.root.children.extend(routes);
        self.root.link_children();
    }

    /// Total number of routes, root included.
    pub fn route_count(&self) -> usize {
        self.root.count()
    }

    /// Depth-first, pre-order iteration over every route.
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, id: &str) -> Option<&RouteNode> {
        self.iter().find(|node| node.id == id)
    }

    pub fn into_root(self) -> RouteNode {
        self.root
    }
}

impl From<RouteNode> for RouteTree {
    fn from(root: RouteNode) -> Self {
        Self::new(root)
    }
}

impl From<RouteTree> for RouteNode {
    fn from(tree: RouteTree) -> Self {
        tree.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RouteTree {
        RouteTree::new(RouteNode::new(ROOT_ROUTE_ID, "/", "root.tsx").with_children(vec![
            RouteNode::new("routes/gists", "gists", "routes/gists.tsx").with_children(vec![
                RouteNode::new("routes/gists/$username", "gists/:username", "routes/gists/$username.tsx"),
            ]),
            RouteNode::new("routes/index", "", "routes/index.tsx"),
        ]))
    }

    #[test]
    fn new_links_parent_ids() {
        let tree = sample();
        let username = tree.find("routes/gists/$username").unwrap();
        assert_eq!(username.parent_id.as_deref(), Some("routes/gists"));
        assert_eq!(
            tree.find("routes/index").unwrap().parent_id.as_deref(),
            Some(ROOT_ROUTE_ID)
        );
        assert!(tree.root().parent_id.is_none());
    }

    #[test]
    fn iter_is_depth_first_preorder() {
        let ids: Vec<_> = sample().iter().map(|node| node.id.clone()).collect();
        assert_eq!(
            ids,
            ["root", "routes/gists", "routes/gists/$username", "routes/index"]
        );
    }

    #[test]
    fn extend_top_level_sets_parent_to_root() {
        let mut tree = sample();
        tree.extend_top_level([RouteNode::new("pages/about", "about", "pages/about.tsx")]);

        assert_eq!(tree.route_count(), 5);
        let about = tree.top_level().last().unwrap();
        assert_eq!(about.id, "pages/about");
        assert_eq!(about.parent_id.as_deref(), Some(ROOT_ROUTE_ID));
    }

    #[test]
    fn serializes_camel_case_without_empty_fields() {
        let node = RouteNode::new("routes/index", "", "routes/index.tsx");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["moduleFile"], "routes/index.tsx");
        assert!(json.get("stylesFile").is_none());
        assert!(json.get("children").is_none());
    }
}
