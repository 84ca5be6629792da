//! Ordered bundling pipeline.
//!
//! Stage order is data: every [`StageKind`] carries an explicit rank and a
//! [`Pipeline`] can only be built from stages that are unique, ascending, and
//! applicable to the build's mode and target.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::target::{BuildOptions, BuildTarget};

/// One step of the bundling pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    /// Supplies the entry and route-module input map.
    DynamicInput = 1,
    /// Points runtime imports at their browser builds (browser only).
    BrowserAlias = 2,
    /// Empties `.client`/`.server` modules on the other side.
    ClientServer = 3,
    Mdx = 4,
    /// Tags route modules so they survive tree-shaking as entries.
    RouteModules = 5,
    Json = 6,
    Image = 7,
    Stylesheet = 8,
    Url = 9,
    /// Modern syntax and type stripping.
    Transpile = 10,
    /// Dependency resolution with target conditions.
    Resolve = 11,
    /// CommonJS interop for legacy packages.
    Interop = 12,
    /// `process.env.NODE_ENV` substitution.
    Env = 13,
    /// Production only.
    Minify = 14,
    /// Writes the asset or server manifest next to the server build.
    Manifest = 15,
}

impl StageKind {
    pub const ALL: [StageKind; 15] = [
        Self::DynamicInput,
        Self::BrowserAlias,
        Self::ClientServer,
        Self::Mdx,
        Self::RouteModules,
        Self::Json,
        Self::Image,
        Self::Stylesheet,
        Self::Url,
        Self::Transpile,
        Self::Resolve,
        Self::Interop,
        Self::Env,
        Self::Minify,
        Self::Manifest,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::DynamicInput => "dynamic-input",
            Self::BrowserAlias => "browser-alias",
            Self::ClientServer => "client-server",
            Self::Mdx => "mdx",
            Self::RouteModules => "route-modules",
            Self::Json => "json",
            Self::Image => "image",
            Self::Stylesheet => "stylesheet",
            Self::Url => "url",
            Self::Transpile => "transpile",
            Self::Resolve => "resolve",
            Self::Interop => "interop",
            Self::Env => "env",
            Self::Minify => "minify",
            Self::Manifest => "manifest",
        }
    }

    /// Whether this stage belongs in a pipeline for `options`.
    pub fn applies_to(self, options: BuildOptions) -> bool {
        match self {
            Self::BrowserAlias => options.target == BuildTarget::Browser,
            Self::Minify => options.mode.is_production(),
            _ => true,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("stage `{0}` appears more than once")]
    Duplicate(StageKind),

    #[error("stage `{later}` must run before `{earlier}`")]
    OutOfOrder { earlier: StageKind, later: StageKind },

    #[error("stage `{stage}` is required for a {options} build")]
    Missing {
        stage: StageKind,
        options: BuildOptions,
    },

    #[error("stage `{stage}` does not apply to a {options} build")]
    NotApplicable {
        stage: StageKind,
        options: BuildOptions,
    },
}

/// A validated, ordered list of stages for one `{mode, target}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    options: BuildOptions,
    stages: Vec<StageKind>,
}

impl Pipeline {
    /// The standard pipeline: every stage that applies to `options`.
    pub fn for_options(options: BuildOptions) -> Self {
        let stages: Vec<_> = StageKind::ALL
            .into_iter()
            .filter(|stage| stage.applies_to(options))
            .collect();
        debug!(%options, stages = stages.len(), "assembled pipeline");
        Self { options, stages }
    }

    /// Validates an explicit stage list.
    pub fn from_stages(
        options: BuildOptions,
        stages: Vec<StageKind>,
    ) -> Result<Self, PipelineError> {
        for (i, &stage) in stages.iter().enumerate() {
            if stages[..i].contains(&stage) {
                return Err(PipelineError::Duplicate(stage));
            }
            if !stage.applies_to(options) {
                return Err(PipelineError::NotApplicable { stage, options });
            }
        }

        if let Some(pair) = stages.windows(2).find(|pair| pair[0] > pair[1]) {
            return Err(PipelineError::OutOfOrder {
                earlier: pair[0],
                later: pair[1],
            });
        }

        if let Some(&stage) = StageKind::ALL
            .iter()
            .find(|stage| stage.applies_to(options) && !stages.contains(stage))
        {
            return Err(PipelineError::Missing { stage, options });
        }

        Ok(Self { options, stages })
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    pub fn stages(&self) -> &[StageKind] {
        &self.stages
    }

    pub fn contains(&self, stage: StageKind) -> bool {
        self.stages.contains(&stage)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
