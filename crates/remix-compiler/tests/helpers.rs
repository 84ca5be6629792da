//! Shared test utilities for remix-compiler tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use remix_compiler::{
    BundleDiagnostic, BundleEngine, BundleOutput, BundleRequest, BundleWarning, DiagnosticKind,
    EngineBundle, Error, OutputChunk, Result,
};
use remix_config::{ResolvedConfig, read_config};
use tempfile::TempDir;

pub fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A project with both entry modules, a root route and two child routes.
pub fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "remix.config.toml", "");
    write(dir.path(), "app/entry.client.tsx", "hydrate();\n");
    write(dir.path(), "app/entry.server.tsx", "export default render;\n");
    write(dir.path(), "app/root.tsx", "export default function Root() {}\n");
    write(dir.path(), "app/routes/index.tsx", "export default function Index() {}\n");
    write(
        dir.path(),
        "app/routes/gists.tsx",
        "export default function Gists() {}\n",
    );
    dir
}

pub async fn config(dir: &TempDir) -> ResolvedConfig {
    read_config(Some(dir.path())).await.unwrap()
}

/// Engine that records every request and renders one entry chunk per input.
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    requests: Arc<Mutex<Vec<BundleRequest>>>,
    failure: Option<String>,
    warnings: Vec<BundleWarning>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `bundle` call fails with an unresolved-import diagnostic.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<BundleWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn requests(&self) -> Vec<BundleRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bundle_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl BundleEngine for FakeEngine {
    async fn bundle(&self, request: BundleRequest) -> Result<Box<dyn EngineBundle>> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(Error::Bundle(vec![BundleDiagnostic::new(
                DiagnosticKind::UnresolvedImport,
                message.clone(),
            )]));
        }

        let pattern = &request.policy.naming.entry_file_names;
        let chunks = request
            .input
            .iter()
            .map(|(name, path)| OutputChunk {
                name: name.clone(),
                file_name: pattern.replace("[name]", name).replace("[hash]", "abc123"),
                code: format!("// {}\n", path.display()),
                is_entry: true,
                facade_module_id: Some(path.to_string_lossy().to_string()),
                imports: Vec::new(),
            })
            .collect();

        Ok(Box::new(FakeBundle {
            output: BundleOutput {
                chunks,
                assets: Vec::new(),
                warnings: self.warnings.clone(),
            },
        }))
    }
}

struct FakeBundle {
    output: BundleOutput,
}

#[async_trait]
impl EngineBundle for FakeBundle {
    async fn generate(&mut self) -> Result<BundleOutput> {
        Ok(self.output.clone())
    }
}
