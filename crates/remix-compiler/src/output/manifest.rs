//! `asset-manifest.json` / `server-manifest.json`.
//!
//! Both manifests map every input name (the target entry and each route id)
//! to the file it was emitted as and the chunks that file imports. The runtime
//! server reads them to find the compiled asset behind a route.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::engine::BundleOutput;
use crate::plugins::RouteModuleIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    #[serde(default)]
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub entries: IndexMap<String, ManifestEntry>,
}

impl AssetManifest {
    /// Collects the entry chunks of `output`.
    ///
    /// Entries are keyed by chunk name; a chunk whose facade is a route module
    /// is keyed by that route's id instead when the engine renamed it.
    pub fn from_output(output: &BundleOutput, routes: &RouteModuleIndex) -> Self {
        let entries = output
            .entry_chunks()
            .map(|chunk| {
                let name = chunk
                    .facade_module_id
                    .as_deref()
                    .and_then(|id| routes.route_id(Path::new(id)))
                    .unwrap_or(&chunk.name)
                    .to_string();
                let entry = ManifestEntry {
                    file: chunk.file_name.clone(),
                    imports: chunk.imports.clone(),
                };
                (name, entry)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the manifest as pretty JSON to `dir/file_name`.
    pub fn write_to(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), entries = self.len(), "wrote manifest");
        Ok(path)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
