//! Target-specific bundler policies.
//!
//! | concern | server | browser |
//! |---|---|---|
//! | externals | every bare specifier | [`BROWSER_EXTERNALS`] only |
//! | tree-shaking | engine default | app code is side-effect free |
//! | warnings | all kept | empty-chunk warnings dropped |
//! | format | CommonJS | ES modules |
//! | file names | fixed | hashed in production |

pub mod chunking;
pub mod external;
pub mod naming;
pub mod treeshake;
pub mod warnings;

pub use chunking::ChunkPolicy;
pub use external::{BROWSER_EXTERNALS, ExternalPolicy};
pub use naming::{ModuleFormat, OutputNaming};
pub use treeshake::TreeshakePolicy;
pub use warnings::{BundleWarning, EMPTY_BUNDLE, WarningFilter};

use crate::target::{BuildOptions, ExportConditions};

/// Every policy that differs between the browser and server graphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPolicy {
    pub external: ExternalPolicy,
    pub treeshake: TreeshakePolicy,
    pub warnings: WarningFilter,
    pub naming: OutputNaming,
    pub chunking: ChunkPolicy,
    pub conditions: ExportConditions,
    pub minify: bool,
}

impl TargetPolicy {
    pub fn for_options(options: BuildOptions) -> Self {
        Self {
            external: ExternalPolicy::for_target(options.target),
            treeshake: TreeshakePolicy::for_target(options.target),
            warnings: WarningFilter::for_target(options.target),
            naming: OutputNaming::for_options(options),
            chunking: ChunkPolicy,
            conditions: options.target.conditions(),
            minify: options.mode.is_production(),
        }
    }
}
