//! `css:`, `img:` and `url:` pseudo-imports.
//!
//! `import href from "css:./app.css"` evaluates to the public URL of the
//! referenced file. The engine emits the file as a build asset and decides its
//! final name from [`crate::policy::OutputNaming::asset_file_names`].

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::plugins::StageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualAssetKind {
    Css,
    Img,
    Url,
}

impl VirtualAssetKind {
    pub const ALL: [Self; 3] = [Self::Css, Self::Img, Self::Url];

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Css => "css:",
            Self::Img => "img:",
            Self::Url => "url:",
        }
    }

    /// The pipeline stage that handles this kind.
    pub fn stage(self) -> StageKind {
        match self {
            Self::Css => StageKind::Stylesheet,
            Self::Img => StageKind::Image,
            Self::Url => StageKind::Url,
        }
    }

    pub fn for_stage(stage: StageKind) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.stage() == stage)
    }

    /// Splits a virtual import into its kind and the referenced path.
    pub fn parse(id: &str) -> Option<(Self, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|kind| id.strip_prefix(kind.prefix()).map(|rest| (kind, rest)))
    }
}

/// A resolved virtual import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualAsset {
    pub kind: VirtualAssetKind,
    /// Absolute path of the referenced file.
    pub source: PathBuf,
}

impl VirtualAsset {
    /// Engine-facing id; stable for the same file regardless of importer.
    pub fn id(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.source.display())
    }

    /// File name the `[name]` placeholder is filled from.
    pub fn name(&self) -> Option<&str> {
        self.source.file_name().and_then(|name| name.to_str())
    }
}

/// Resolves virtual imports against the app directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualAssets {
    app_dir: PathBuf,
    public_path: String,
}

impl VirtualAssets {
    pub fn new(app_dir: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
        Self {
            app_dir: app_dir.into(),
            public_path: public_path.into(),
        }
    }

    /// Resolves `id` relative to the importing module, or to the app directory
    /// when there is no importer. Returns `None` for non-virtual ids.
    pub fn resolve(&self, id: &str, importer: Option<&Path>) -> Option<VirtualAsset> {
        let (kind, reference) = VirtualAssetKind::parse(id)?;
        let base = importer
            .and_then(Path::parent)
            .unwrap_or(self.app_dir.as_path());
        Some(VirtualAsset {
            kind,
            source: base.join(reference).clean(),
        })
    }

    /// Public URL of an emitted asset, given its path inside the browser build.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}{file_name}", self.public_path)
    }

    /// Module source for a virtual import whose asset was emitted as `file_name`.
    pub fn module_code(&self, file_name: &str) -> String {
        format!("export default {};\n", quote(&self.public_url(file_name)))
    }
}

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
