//! # remix-routes
//!
//! Route discovery for the Remix compiler.
//!
//! This crate turns an application source directory into a nested route tree and
//! flattens that tree into the id-keyed manifest the build layer consumes:
//!
//! - [`resolve`] walks `<app>/routes` and infers ids, nesting and URL paths from file names
//! - [`define_routes`] builds routes programmatically (the `routes` config hook)
//! - [`flatten`] turns a [`RouteTree`] into a [`RouteManifest`] keyed by route id
//!
//! ```no_run
//! use remix_routes::{flatten, resolve};
//! use std::path::Path;
//!
//! # fn main() -> remix_routes::Result<()> {
//! let tree = resolve(Path::new("app"), Path::new("data"))?;
//! let manifest = flatten(&tree)?;
//! for route in manifest.iter() {
//!     println!("{} -> {:?}", route.id, route.parent_id);
//! }
//! # Ok(()) }
//! ```

pub mod convention;
pub mod define;
pub mod error;
pub mod files;
pub mod manifest;
pub mod parent;
pub mod path;
pub mod route;

pub use convention::{ConventionResolver, ROUTES_DIR, resolve};
pub use define::{
    DeclaredRoute, RouteDefiner, RouteOptions, RouteSource, define_declared, define_routes,
    route_id_for_file,
};
pub use error::{Result, RouteResolutionError};
pub use files::{is_module_file, is_styles_file};
pub use manifest::{ManifestRoute, RouteManifest, flatten};
pub use parent::{LongestPrefix, ParentStrategy};
pub use path::create_route_path;
pub use route::{ROOT_ROUTE_ID, RouteNode, RouteTree};
