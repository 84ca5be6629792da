//! MDX compilation seam.
//!
//! No MDX compiler ships with this crate. Callers that route to `.mdx`/`.md`
//! modules plug one in through [`MdxCompiler`]; engines hand it the raw
//! source plus the `mdx` table from the config file and bundle the JSX it returns.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

pub trait MdxCompiler: Send + Sync {
    /// Compiles MDX `source` read from `path` into a JSX module.
    fn compile(&self, source: &str, path: &Path, options: Option<&Value>) -> anyhow::Result<String>;
}

/// The MDX stage as handed to an engine.
#[derive(Clone)]
pub struct MdxStage {
    pub compiler: Option<Arc<dyn MdxCompiler>>,
    pub options: Option<Value>,
}

impl MdxStage {
    pub fn handles(id: &str) -> bool {
        Path::new(id)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "mdx" || ext == "md")
    }

    /// Compiles through the configured compiler; `None` when none is installed.
    pub fn compile(&self, source: &str, path: &Path) -> Option<anyhow::Result<String>> {
        let compiler = self.compiler.as_ref()?;
        Some(compiler.compile(source, path, self.options.as_ref()))
    }
}

impl fmt::Debug for MdxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MdxStage")
            .field("compiler", &self.compiler.is_some())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl MdxCompiler for Upper {
        fn compile(&self, source: &str, _path: &Path, options: Option<&Value>) -> anyhow::Result<String> {
            let suffix = options.and_then(|o| o["suffix"].as_str()).unwrap_or_default();
            Ok(format!("export default () => {:?};", format!("{}{suffix}", source.to_uppercase())))
        }
    }

    #[test]
    fn recognizes_markdown_modules() {
        assert!(MdxStage::handles("/app/routes/post.mdx"));
        assert!(MdxStage::handles("/app/routes/readme.md"));
        assert!(!MdxStage::handles("/app/routes/index.tsx"));
    }

    #[test]
    fn passes_config_options_to_compiler() {
        let stage = MdxStage {
            compiler: Some(Arc::new(Upper)),
            options: Some(serde_json::json!({ "suffix": "!" })),
        };
        let code = stage.compile("hi", Path::new("post.mdx")).unwrap().unwrap();
        assert_eq!(code, "export default () => \"HI!\";");
    }

    #[test]
    fn no_compiler_means_no_output() {
        let stage = MdxStage {
            compiler: None,
            options: None,
        };
        assert!(stage.compile("# hi", Path::new("post.mdx")).is_none());
    }
}
