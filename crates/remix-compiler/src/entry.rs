//! Entry-point lookup and the bundle input map.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use remix_config::ResolvedConfig;
use remix_routes::RouteResolutionError;
use remix_routes::files::{ENTRY_EXTENSIONS, find_with_extensions};

use crate::target::BuildTarget;
use crate::{Error, Result};

/// Named bundle inputs: the target entry first, then one per route module.
pub type InputMap = IndexMap<String, PathBuf>;

/// Finds `entry.client.*` or `entry.server.*` in the app directory.
pub fn find_entry(app_dir: &Path, target: BuildTarget) -> Result<PathBuf> {
    find_with_extensions(app_dir, target.entry_name(), ENTRY_EXTENSIONS).ok_or_else(|| {
        Error::EntryMissing {
            target,
            searched: ENTRY_EXTENSIONS
                .iter()
                .map(|ext| app_dir.join(format!("{}.{ext}", target.entry_name())))
                .collect(),
        }
    })
}

/// Builds the input map for `target`.
///
/// Routes without a module file contribute nothing; each other route becomes
/// its own input keyed by route id so it gets a separately addressable output.
/// A route whose id is the entry name is rejected as a duplicate id.
pub fn build_input(config: &ResolvedConfig, target: BuildTarget) -> Result<InputMap> {
    let app_dir = config.app_directory();
    let mut input = InputMap::new();
    input.insert(target.entry_name().to_string(), find_entry(app_dir, target)?);

    for route in config.route_manifest() {
        let Some(file) = &route.module_file else {
            continue;
        };
        if input.contains_key(&route.id) {
            return Err(RouteResolutionError::DuplicateRouteId(route.id.clone()).into());
        }
        input.insert(route.id.clone(), app_dir.join(file));
    }
    Ok(input)
}
