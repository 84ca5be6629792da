//! Rolldown implementation of [`BundleEngine`].
//!
//! Dynamic input, browser aliases, JSON, transpilation, CommonJS interop and
//! minification are native to Rolldown and switched on through
//! [`BundlerOptions`]. Every other stage of the request's pipeline registers
//! one plugin, in pipeline order.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use rolldown::{
    AdvancedChunksOptions, BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform,
    RawMinifyOptions, ResolveOptions,
};
use rolldown_common::side_effects::HookSideEffects;
use rolldown_common::{
    ChunkingContext, EmittedAsset, MatchGroup, MatchGroupName, ModuleType, Output,
    ResolvedExternal,
};
use rolldown_plugin::__inner::SharedPluginable;
use rolldown_plugin::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage,
    Plugin, PluginContext, SharedTransformPluginContext,
};
use tracing::{debug, trace};

use crate::engine::{
    BundleEngine, BundleOutput, BundleRequest, EngineBundle, OutputAsset, OutputChunk,
};
use crate::plugins::{EMPTY_MODULE, MdxStage, StageKind, VirtualAssetKind};
use crate::policy::{BundleWarning, EMPTY_BUNDLE, ModuleFormat};
use crate::{Error, Result};

/// Bundles with Rolldown. Each request gets its own bundler and plugin set.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolldownEngine;

#[async_trait]
impl BundleEngine for RolldownEngine {
    async fn bundle(&self, request: BundleRequest) -> Result<Box<dyn EngineBundle>> {
        request.validate()?;
        let request = Arc::new(request);
        let options = bundler_options(&request);
        let plugins = plugins(&request);

        let mut bundler = BundlerBuilder::default()
            .with_options(options)
            .with_plugins(plugins)
            .build()
            .map_err(|e| Error::from_engine(&e))?;

        // Rolldown resolves and transforms while generating, so do it here to
        // surface bundle errors from `build` rather than from a later `generate`.
        let bundle = bundler.generate().await.map_err(|e| Error::from_engine(&e))?;

        let mut output = BundleOutput::default();
        for item in &bundle.assets {
            match item {
                Output::Chunk(chunk) => output.chunks.push(OutputChunk {
                    name: chunk.name.to_string(),
                    file_name: chunk.filename.to_string(),
                    code: chunk.code.clone(),
                    is_entry: chunk.is_entry,
                    facade_module_id: chunk.facade_module_id.as_ref().map(|id| id.to_string()),
                    imports: chunk.imports.iter().map(|s| s.to_string()).collect(),
                }),
                Output::Asset(asset) => output.assets.push(OutputAsset {
                    file_name: asset.filename.to_string(),
                    source: asset.source.as_bytes().to_vec(),
                }),
            }
        }
        output.warnings = bundle
            .warnings
            .iter()
            .map(|warning| convert_warning(warning))
            .collect();

        debug!(
            options = %request.options,
            chunks = output.chunks.len(),
            assets = output.assets.len(),
            "rolldown bundle generated"
        );
        Ok(Box::new(RolldownBundle { output }))
    }
}

struct RolldownBundle {
    output: BundleOutput,
}

#[async_trait]
impl EngineBundle for RolldownBundle {
    async fn generate(&mut self) -> Result<BundleOutput> {
        Ok(self.output.clone())
    }
}

fn convert_warning(warning: &impl std::fmt::Debug) -> BundleWarning {
    let message = format!("{warning:?}");
    let code = if message.contains("EmptyBundle") || message.contains(EMPTY_BUNDLE) {
        EMPTY_BUNDLE
    } else {
        "BUNDLER_WARNING"
    };
    BundleWarning::new(code, message)
}

fn bundler_options(request: &BundleRequest) -> BundlerOptions {
    let naming = &request.policy.naming;
    BundlerOptions {
        input: Some(
            request
                .input
                .iter()
                .map(|(name, path)| InputItem {
                    name: Some(name.clone()),
                    import: path.to_string_lossy().to_string(),
                })
                .collect(),
        ),
        cwd: Some(request.cwd.clone()),
        format: Some(match naming.format {
            ModuleFormat::Cjs => OutputFormat::Cjs,
            ModuleFormat::Esm => OutputFormat::Esm,
        }),
        platform: Some(if request.policy.conditions.contains("node") {
            Platform::Node
        } else {
            Platform::Browser
        }),
        entry_filenames: Some(naming.entry_file_names.clone().into()),
        chunk_filenames: Some(naming.chunk_file_names.clone().into()),
        asset_filenames: Some(naming.asset_file_names.clone().into()),
        minify: request.minify().then(|| RawMinifyOptions::from(true)),
        resolve: Some(resolve_options(request)),
        advanced_chunks: Some(chunk_groups(request)),
        ..Default::default()
    }
}

/// One dynamically named group: dependency modules land in a chunk named after
/// their package, everything else is left to Rolldown's default splitting.
fn chunk_groups(request: &BundleRequest) -> AdvancedChunksOptions {
    let chunking = request.policy.chunking;
    let name = MatchGroupName::Dynamic(Arc::new(
        move |module_id: &str, _ctx: &ChunkingContext| {
            let name = chunking.chunk_name(module_id);
            Box::pin(async move { Ok(name) })
        },
    ));

    AdvancedChunksOptions {
        min_size: None,
        min_share_count: None,
        max_size: None,
        min_module_size: None,
        max_module_size: None,
        include_dependencies_recursively: None,
        groups: Some(vec![MatchGroup {
            name,
            test: None,
            priority: None,
            min_size: None,
            min_share_count: None,
            min_module_size: None,
            max_module_size: None,
            max_size: None,
        }]),
    }
}

fn resolve_options(request: &BundleRequest) -> ResolveOptions {
    let conditions = request.policy.conditions;
    let mut modules: Vec<String> = request
        .cwd
        .ancestors()
        .map(|dir| dir.join("node_modules").to_string_lossy().to_string())
        .collect();
    modules.push("node_modules".to_string());

    let alias = (!request.aliases.is_empty()).then(|| {
        request
            .aliases
            .iter()
            .map(|(from, to)| (from.to_string(), vec![Some(to.to_string())]))
            .collect()
    });

    ResolveOptions {
        alias,
        main_fields: Some(conditions.main_fields().iter().map(|s| (*s).to_string()).collect()),
        condition_names: Some(conditions.to_vec()),
        extensions: Some(
            [".js", ".jsx", ".json", ".mjs", ".ts", ".tsx", ".mdx", ".md"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        ),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

/// The plugin implementing `stage`, or `None` when the stage is covered by
/// [`BundlerOptions`] or by the orchestrator.
fn stage_plugin(stage: StageKind, request: &Arc<BundleRequest>) -> Option<SharedPluginable> {
    let request = Arc::clone(request);
    let plugin: SharedPluginable = match stage {
        StageKind::ClientServer => Arc::new(ClientServerPlugin { request }),
        StageKind::Mdx => Arc::new(MdxPlugin { request }),
        StageKind::RouteModules => Arc::new(RouteModulesPlugin { request }),
        StageKind::Image | StageKind::Stylesheet | StageKind::Url => {
            let kind = VirtualAssetKind::for_stage(stage)?;
            Arc::new(VirtualAssetPlugin { kind, request })
        }
        StageKind::Resolve => Arc::new(ExternalsPlugin { request }),
        StageKind::Env => Arc::new(EnvPlugin { request }),
        StageKind::DynamicInput
        | StageKind::BrowserAlias
        | StageKind::Json
        | StageKind::Transpile
        | StageKind::Interop
        | StageKind::Minify
        | StageKind::Manifest => return None,
    };
    Some(plugin)
}

fn plugins(request: &Arc<BundleRequest>) -> Vec<SharedPluginable> {
    request
        .pipeline
        .stages()
        .iter()
        .filter_map(|stage| {
            let plugin = stage_plugin(*stage, request);
            trace!(%stage, native = plugin.is_none(), "registering stage");
            plugin
        })
        .collect()
}

fn js_module(code: String, module_type: ModuleType) -> HookLoadOutput {
    HookLoadOutput {
        code: code.into(),
        module_type: Some(module_type),
        ..Default::default()
    }
}

/// Empties `.client` modules on the server and `.server` modules in the browser.
#[derive(Debug)]
struct ClientServerPlugin {
    request: Arc<BundleRequest>,
}

impl Plugin for ClientServerPlugin {
    fn name(&self) -> Cow<'static, str> {
        "remix:client-server".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Load
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let strips = self.request.client_server.strips(args.id);
        async move { Ok(strips.then(|| js_module(EMPTY_MODULE.to_string(), ModuleType::Js))) }
    }
}

#[derive(Debug)]
struct MdxPlugin {
    request: Arc<BundleRequest>,
}

impl Plugin for MdxPlugin {
    fn name(&self) -> Cow<'static, str> {
        "remix:mdx".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Load
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let id = args.id.to_string();
        let request = Arc::clone(&self.request);

        async move {
            if !MdxStage::handles(&id) {
                return Ok(None);
            }
            let path = Path::new(&id);
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read MDX module {id}"))?;
            let code = request
                .mdx
                .compile(&source, path)
                .with_context(|| format!("No MDX compiler installed for {id}"))?
                .with_context(|| format!("Failed to compile MDX module {id}"))?;
            Ok(Some(js_module(code, ModuleType::Jsx)))
        }
    }
}

/// Marks route modules as side-effectful and applies the target's
/// tree-shaking hints to everything else.
#[derive(Debug)]
struct RouteModulesPlugin {
    request: Arc<BundleRequest>,
}

impl Plugin for RouteModulesPlugin {
    fn name(&self) -> Cow<'static, str> {
        "remix:route-modules".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Transform
    }

    fn transform(
        &self,
        _ctx: SharedTransformPluginContext,
        args: &HookTransformArgs<'_>,
    ) -> impl std::future::Future<Output = HookTransformReturn> + Send {
        let side_effects = if self.request.route_modules.is_route_module(args.id) {
            Some(true)
        } else {
            self.request.policy.treeshake.module_side_effects(args.id)
        };

        async move {
            Ok(side_effects.map(|effectful| HookTransformOutput {
                code: None,
                map: None,
                side_effects: Some(if effectful {
                    HookSideEffects::True
                } else {
                    HookSideEffects::False
                }),
                module_type: None,
            }))
        }
    }
}

/// Resolves one kind of virtual import and emits the referenced file as an asset.
#[derive(Debug)]
struct VirtualAssetPlugin {
    kind: VirtualAssetKind,
    request: Arc<BundleRequest>,
}

impl Plugin for VirtualAssetPlugin {
    fn name(&self) -> Cow<'static, str> {
        match self.kind {
            VirtualAssetKind::Css => "remix:stylesheet".into(),
            VirtualAssetKind::Img => "remix:image".into(),
            VirtualAssetKind::Url => "remix:url".into(),
        }
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Load
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let asset = self
            .request
            .assets
            .resolve(args.specifier, args.importer.map(Path::new))
            .filter(|asset| asset.kind == self.kind);

        async move {
            Ok(asset.map(|asset| HookResolveIdOutput {
                id: asset.id().into(),
                external: Some(ResolvedExternal::Bool(false)),
                ..Default::default()
            }))
        }
    }

    fn load(
        &self,
        ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let asset = self
            .request
            .assets
            .resolve(args.id, None)
            .filter(|asset| asset.kind == self.kind);
        let request = Arc::clone(&self.request);
        let ctx = ctx.clone();

        async move {
            let Some(asset) = asset else {
                return Ok(None);
            };
            let source = std::fs::read(&asset.source)
                .with_context(|| format!("Failed to read asset {}", asset.source.display()))?;
            let reference_id = ctx.emit_file(
                EmittedAsset {
                    name: asset.name().map(str::to_string),
                    original_file_name: Some(asset.source.to_string_lossy().into_owned()),
                    file_name: None,
                    source: source.into(),
                },
                None,
                None,
            )?;
            let file_name = ctx.get_file_name(&reference_id)?;
            debug!(asset = %asset.source.display(), file = %file_name, "emitted asset");
            Ok(Some(js_module(
                request.assets.module_code(&file_name),
                ModuleType::Js,
            )))
        }
    }
}

/// Leaves external dependencies out of the bundle.
#[derive(Debug)]
struct ExternalsPlugin {
    request: Arc<BundleRequest>,
}

impl Plugin for ExternalsPlugin {
    fn name(&self) -> Cow<'static, str> {
        "remix:externals".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let external = self.request.policy.external.is_external(&specifier);

        async move {
            Ok(external.then(|| HookResolveIdOutput {
                id: specifier.into(),
                external: Some(ResolvedExternal::Bool(true)),
                ..Default::default()
            }))
        }
    }
}

/// `process.env.NODE_ENV` substitution.
#[derive(Debug)]
struct EnvPlugin {
    request: Arc<BundleRequest>,
}

impl Plugin for EnvPlugin {
    fn name(&self) -> Cow<'static, str> {
        "remix:env".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Transform
    }

    fn transform(
        &self,
        _ctx: SharedTransformPluginContext,
        args: &HookTransformArgs<'_>,
    ) -> impl std::future::Future<Output = HookTransformReturn> + Send {
        let code = self.request.env.apply(args.code);

        async move {
            Ok(code.map(|code| HookTransformOutput {
                code: Some(code),
                map: None,
                side_effects: None,
                module_type: None,
            }))
        }
    }
}
