//! Grouping of shared dependency code into per-package chunks.

use crate::policy::external::package_name;

const DEPENDENCY_DIR: &str = "node_modules/";

/// Names shared chunks after the top-level package that owns a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkPolicy;

impl ChunkPolicy {
    /// Chunk name for a resolved module id, or `None` to let the engine decide.
    ///
    /// Only the first `node_modules` segment counts, so a package nested inside
    /// another package's dependencies lands in its owner's chunk. Scoped names
    /// have their `@` replaced so the chunk path stays a plain directory.
    pub fn chunk_name(&self, id: &str) -> Option<String> {
        let normalized = id.replace('\\', "/");
        let start = normalized.find(DEPENDENCY_DIR)? + DEPENDENCY_DIR.len();
        let package = package_name(&normalized[start..]);
        if package.is_empty() {
            return None;
        }
        Some(package.replacen('@', "_", 1))
    }
}
