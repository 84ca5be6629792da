//! File-type classification for route discovery.

use std::path::{Path, PathBuf};

/// Extensions of files that compile to a route module.
pub const MODULE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mdx", "md"];

/// Extensions of files attached to a route as its stylesheet.
pub const STYLES_EXTENSIONS: &[&str] = &["css"];

/// Extensions tried, in order, for `root`, `entry.client` and `entry.server`.
pub const ENTRY_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Extensions tried, in order, for route loader files in the data directory.
pub const DATA_EXTENSIONS: &[&str] = &["js", "ts"];

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Returns true if the path has a route module extension.
pub fn is_module_file(path: impl AsRef<Path>) -> bool {
    extension(path.as_ref()).is_some_and(|ext| MODULE_EXTENSIONS.contains(&ext))
}

/// Returns true if the path has a stylesheet extension.
pub fn is_styles_file(path: impl AsRef<Path>) -> bool {
    extension(path.as_ref()).is_some_and(|ext| STYLES_EXTENSIONS.contains(&ext))
}

/// Finds the first existing `<dir>/<basename>.<ext>` for the given extensions.
pub fn find_with_extensions(dir: &Path, basename: &str, extensions: &[&str]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| dir.join(format!("{basename}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Renders a relative path with `/` separators regardless of platform.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strips the final extension from a `/`-separated path.
///
/// Only the last extension goes: `routes/about.us.tsx` becomes `routes/about.us`.
pub(crate) fn strip_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map_or(0, |idx| idx + 1);
    match path[file_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..file_start + dot],
    }
}
