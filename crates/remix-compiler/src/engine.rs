//! The bundling-engine seam.
//!
//! The orchestrator decides *what* to bundle and under which policies; a
//! [`BundleEngine`] does the bundling. Every `bundle` call must construct a
//! fresh engine instance, so nothing is cached between two builds.

use std::path::PathBuf;

use async_trait::async_trait;
use remix_config::ResolvedConfig;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::entry::{InputMap, build_input};
use crate::plugins::{
    AliasMap, ClientServerFilter, EnvReplacements, MdxCompiler, MdxStage, Pipeline,
    RouteModuleIndex, StageKind, VirtualAssets,
};
use crate::policy::{BundleWarning, TargetPolicy};
use crate::target::BuildOptions;

/// Everything an engine needs to produce one bundle graph.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub options: BuildOptions,
    /// Project root; relative ids resolve from here.
    pub cwd: PathBuf,
    pub input: InputMap,
    pub pipeline: Pipeline,
    pub policy: TargetPolicy,
    pub aliases: AliasMap,
    pub client_server: ClientServerFilter,
    pub mdx: MdxStage,
    pub route_modules: RouteModuleIndex,
    pub assets: VirtualAssets,
    pub env: EnvReplacements,
}

impl BundleRequest {
    /// Assembles the request for `options` from a resolved configuration.
    ///
    /// Fails with [`crate::Error::EntryMissing`] before any engine is involved.
    pub fn assemble(
        config: &ResolvedConfig,
        options: BuildOptions,
        mdx: Option<std::sync::Arc<dyn MdxCompiler>>,
    ) -> Result<Self> {
        let input = build_input(config, options.target)?;
        let pipeline = Pipeline::for_options(options);

        let aliases = if pipeline.contains(StageKind::BrowserAlias) {
            AliasMap::browser()
        } else {
            AliasMap::default()
        };

        Ok(Self {
            options,
            cwd: config.root_directory().to_path_buf(),
            input,
            policy: TargetPolicy::for_options(options),
            aliases,
            client_server: ClientServerFilter::for_target(options.target),
            mdx: MdxStage {
                compiler: mdx,
                options: config.mdx().cloned(),
            },
            route_modules: RouteModuleIndex::from_manifest(
                config.route_manifest(),
                config.app_directory(),
            ),
            assets: VirtualAssets::new(config.app_directory(), config.public_path()),
            env: EnvReplacements::for_mode(options.mode),
            pipeline,
        })
    }

    /// Checks that `pipeline` is the complete, ordered stage list for `options`.
    ///
    /// Requests built by [`BundleRequest::assemble`] always pass; engines call
    /// this before registering stages so a hand-edited request fails with
    /// [`crate::Error::InvalidPipeline`] instead of bundling with stages missing.
    pub fn validate(&self) -> Result<()> {
        Pipeline::from_stages(self.options, self.pipeline.stages().to_vec())?;
        Ok(())
    }

    /// Whether the engine should minify: production pipelines only.
    pub fn minify(&self) -> bool {
        self.policy.minify && self.pipeline.contains(StageKind::Minify)
    }
}

/// One emitted JavaScript chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputChunk {
    /// Input name for entry chunks, generated name otherwise.
    pub name: String,
    /// Path relative to the output directory.
    pub file_name: String,
    pub code: String,
    pub is_entry: bool,
    /// Absolute path of the module the chunk was generated for, if any.
    pub facade_module_id: Option<String>,
    /// File names of chunks this chunk imports statically.
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputAsset {
    pub file_name: String,
    pub source: Vec<u8>,
}

/// In-memory result of [`EngineBundle::generate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleOutput {
    pub chunks: Vec<OutputChunk>,
    pub assets: Vec<OutputAsset>,
    pub warnings: Vec<BundleWarning>,
}

impl BundleOutput {
    pub fn entry_chunks(&self) -> impl Iterator<Item = &OutputChunk> {
        self.chunks.iter().filter(|chunk| chunk.is_entry)
    }

    pub fn chunk(&self, name: &str) -> Option<&OutputChunk> {
        self.chunks.iter().find(|chunk| chunk.name == name)
    }

    /// Every file this output writes, chunks first.
    pub fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.chunks
            .iter()
            .map(|chunk| (chunk.file_name.as_str(), chunk.code.as_bytes()))
            .chain(
                self.assets
                    .iter()
                    .map(|asset| (asset.file_name.as_str(), asset.source.as_slice())),
            )
    }
}

/// A bundling engine.
#[async_trait]
pub trait BundleEngine: Send + Sync {
    /// Builds the module graph for `request`.
    ///
    /// Resolution and transform failures surface here as
    /// [`crate::Error::Bundle`].
    async fn bundle(&self, request: BundleRequest) -> Result<Box<dyn EngineBundle>>;
}

/// A built module graph that can be rendered into output files.
#[async_trait]
pub trait EngineBundle: Send + Sync {
    /// Renders output without touching the disk. May be called repeatedly.
    async fn generate(&mut self) -> Result<BundleOutput>;
}
