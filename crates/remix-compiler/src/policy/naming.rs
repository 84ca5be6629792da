//! Output format and file-name patterns.

use crate::target::{BuildMode, BuildOptions, BuildTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    /// CommonJS, one callable-export file per input.
    Cjs,
    /// ES modules with shared chunks.
    Esm,
}

/// File-name templates using the `[name]`, `[hash]` and `[extname]` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    pub format: ModuleFormat,
    pub entry_file_names: String,
    pub chunk_file_names: String,
    pub asset_file_names: String,
}

impl OutputNaming {
    pub fn for_options(options: BuildOptions) -> Self {
        match (options.target, options.mode) {
            (BuildTarget::Server, _) => Self {
                format: ModuleFormat::Cjs,
                entry_file_names: "[name].js".to_string(),
                chunk_file_names: "_shared/[name].js".to_string(),
                asset_file_names: "_assets/[name][extname]".to_string(),
            },
            (BuildTarget::Browser, BuildMode::Production) => Self {
                format: ModuleFormat::Esm,
                entry_file_names: "[name]-[hash].js".to_string(),
                chunk_file_names: "_shared/[name]-[hash].js".to_string(),
                asset_file_names: "_assets/[name]-[hash][extname]".to_string(),
            },
            (BuildTarget::Browser, BuildMode::Development) => Self {
                format: ModuleFormat::Esm,
                entry_file_names: "[name].js".to_string(),
                chunk_file_names: "_shared/[name].js".to_string(),
                asset_file_names: "_assets/[name][extname]".to_string(),
            },
        }
    }

    pub fn is_hashed(&self) -> bool {
        self.entry_file_names.contains("[hash]")
    }
}
