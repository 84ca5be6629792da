//! Error types for route resolution.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteResolutionError>;

/// Fatal errors raised while discovering or assembling routes.
///
/// Every variant aborts the build before bundling starts.
#[derive(Debug, Error)]
pub enum RouteResolutionError {
    /// A file under `routes/` is neither a module nor a stylesheet.
    #[error("unrecognized file type in routes directory: {}", .path.display())]
    UnrecognizedFile { path: PathBuf },

    /// A stylesheet was found for a route that has no module file.
    #[error(
        "styles file {} has no matching route module for route \"{id}\"",
        .styles_file.display()
    )]
    StylesWithoutModule { id: String, styles_file: PathBuf },

    /// Two module files map to the same route id (e.g. `gists.tsx` and `gists.mdx`).
    #[error(
        "route \"{id}\" has more than one module file: {} and {}",
        .first.display(),
        .second.display()
    )]
    ConflictingModules {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// No `root.*` layout module in the app directory.
    #[error("missing root route module: expected root.{{js,jsx,ts,tsx}} in {}", .dir.display())]
    MissingRootModule { dir: PathBuf },

    /// Two routes share one id.
    #[error("duplicate route id \"{0}\"")]
    DuplicateRouteId(String),

    /// A manifest entry points at a parent id that is not in the manifest.
    #[error("route \"{id}\" references missing parent route \"{parent_id}\"")]
    MissingParent { id: String, parent_id: String },

    /// A manifest entry cannot be reached by following parent links from the root.
    #[error("route \"{0}\" is not reachable from the root route")]
    Unreachable(String),

    /// A declared route is malformed.
    #[error("invalid route definition: {0}")]
    InvalidDefinition(String),

    /// The directory walk failed.
    #[error("failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
