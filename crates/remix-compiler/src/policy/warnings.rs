//! Bundler warnings and the per-target filter applied to them.

use serde::{Deserialize, Serialize};

use crate::target::BuildTarget;

/// Warning code engines use for chunks that ended up with no code.
pub const EMPTY_BUNDLE: &str = "EMPTY_BUNDLE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleWarning {
    pub code: String,
    pub message: String,
}

impl BundleWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_empty_chunk(&self) -> bool {
        self.code == EMPTY_BUNDLE
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarningFilter {
    #[default]
    KeepAll,
    /// Empty chunks are expected once server-only code has been shaken out.
    SuppressEmptyChunks,
}

impl WarningFilter {
    pub fn for_target(target: BuildTarget) -> Self {
        match target {
            BuildTarget::Server => Self::KeepAll,
            BuildTarget::Browser => Self::SuppressEmptyChunks,
        }
    }

    pub fn keeps(&self, warning: &BundleWarning) -> bool {
        match self {
            Self::KeepAll => true,
            Self::SuppressEmptyChunks => !warning.is_empty_chunk(),
        }
    }

    pub fn apply(&self, warnings: Vec<BundleWarning>) -> Vec<BundleWarning> {
        warnings.into_iter().filter(|w| self.keeps(w)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<BundleWarning> {
        vec![
            BundleWarning::new(EMPTY_BUNDLE, "Generated an empty chunk: \"routes/admin\""),
            BundleWarning::new("CIRCULAR_DEPENDENCY", "a -> b -> a"),
        ]
    }

    #[test]
    fn browser_drops_empty_chunk_warnings() {
        let kept = WarningFilter::for_target(BuildTarget::Browser).apply(sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "CIRCULAR_DEPENDENCY");
    }

    #[test]
    fn server_keeps_everything() {
        let kept = WarningFilter::for_target(BuildTarget::Server).apply(sample());
        assert_eq!(kept, sample());
    }
}
