//! Pipeline stages and the engine-independent logic behind them.

pub mod alias;
pub mod assets;
pub mod client_server;
pub mod env;
pub mod mdx;
pub mod pipeline;
pub mod routes;

pub use alias::AliasMap;
pub use assets::{VirtualAsset, VirtualAssetKind, VirtualAssets};
pub use client_server::{ClientServerFilter, EMPTY_MODULE};
pub use env::EnvReplacements;
pub use mdx::{MdxCompiler, MdxStage};
pub use pipeline::{Pipeline, PipelineError, StageKind};
pub use routes::RouteModuleIndex;
