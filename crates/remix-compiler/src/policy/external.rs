//! Which import specifiers are left out of the bundle.

use std::path::Path;

use crate::plugins::assets::VirtualAssetKind;
use crate::target::BuildTarget;

/// Packages that only make sense on the server and must never be pulled
/// into the browser graph.
pub const BROWSER_EXTERNALS: &[&str] = &[
    "@remix-run/architect",
    "@remix-run/core",
    "@remix-run/data",
    "@remix-run/express",
    "@remix-run/node",
    "@remix-run/vercel",
    "express",
];

/// External-module classification for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalPolicy {
    /// Everything that is not local source or a virtual asset stays external.
    Server,
    /// Only the listed packages (and their subpaths) stay external.
    Browser { deny: Vec<String> },
}

impl ExternalPolicy {
    pub fn for_target(target: BuildTarget) -> Self {
        match target {
            BuildTarget::Server => Self::Server,
            BuildTarget::Browser => Self::Browser {
                deny: BROWSER_EXTERNALS.iter().map(|s| (*s).to_string()).collect(),
            },
        }
    }

    /// Returns true when `id` should be resolved at runtime instead of bundled.
    pub fn is_external(&self, id: &str) -> bool {
        match self {
            Self::Server => !is_local(id) && VirtualAssetKind::parse(id).is_none(),
            Self::Browser { deny } => {
                let package = package_name(id);
                deny.iter().any(|name| name == package)
            }
        }
    }
}

/// Relative, absolute, or engine-internal (`\0`-prefixed) ids.
pub fn is_local(id: &str) -> bool {
    id.starts_with('.') || id.starts_with('\0') || Path::new(id).is_absolute()
}

/// Package part of a bare specifier: `react-dom/server` -> `react-dom`,
/// `@remix-run/react/browser` -> `@remix-run/react`.
pub fn package_name(id: &str) -> &str {
    let mut segments = id.splitn(3, '/');
    let first = segments.next().unwrap_or(id);
    if first.starts_with('@') {
        match segments.next() {
            Some(second) => &id[..first.len() + 1 + second.len()],
            None => id,
        }
    } else {
        first
    }
}
