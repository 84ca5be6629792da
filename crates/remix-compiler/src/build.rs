//! One-shot builds.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use remix_config::ResolvedConfig;
use tracing::{debug, info, warn};

use crate::Result;
use crate::engine::{BundleEngine, BundleOutput, BundleRequest, EngineBundle};
use crate::output::{AssetManifest, write_output};
use crate::plugins::{MdxCompiler, RouteModuleIndex, StageKind};
use crate::policy::WarningFilter;
use crate::target::{BuildMode, BuildOptions, BuildTarget};

/// Drives a [`BundleEngine`] for browser and server builds.
///
/// The compiler holds no per-build state; browser and server builds of the
/// same configuration may run from clones of it at the same time.
#[derive(Clone)]
pub struct Compiler {
    engine: Arc<dyn BundleEngine>,
    mdx: Option<Arc<dyn MdxCompiler>>,
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("mdx", &self.mdx.is_some())
            .finish_non_exhaustive()
    }
}

impl Compiler {
    pub fn new(engine: impl BundleEngine + 'static) -> Self {
        Self::with_engine(Arc::new(engine))
    }

    pub fn with_engine(engine: Arc<dyn BundleEngine>) -> Self {
        Self { engine, mdx: None }
    }

    /// Compiler backed by Rolldown.
    #[cfg(feature = "rolldown")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rolldown")))]
    pub fn rolldown() -> Self {
        Self::new(crate::rolldown::RolldownEngine)
    }

    /// Installs the compiler used for `.mdx` and `.md` route modules.
    pub fn with_mdx(mut self, compiler: impl MdxCompiler + 'static) -> Self {
        self.mdx = Some(Arc::new(compiler));
        self
    }

    /// Bundles `config` for one target.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::EntryMissing`] when the target's entry module is absent;
    ///   the engine is not invoked
    /// - [`crate::Error::Bundle`] for resolve and transform failures
    pub async fn build(&self, config: &ResolvedConfig, options: BuildOptions) -> Result<Build> {
        let request = BundleRequest::assemble(config, options, self.mdx.clone())?;
        debug!(
            %options,
            inputs = request.input.len(),
            stages = request.pipeline.len(),
            "starting build"
        );

        let started = Instant::now();
        let build = Build {
            options,
            warnings: request.policy.warnings,
            route_modules: request.route_modules.clone(),
            emits_manifest: request.pipeline.contains(StageKind::Manifest),
            output_dir: options.target.output_dir(config).to_path_buf(),
            manifest_dir: config.server_build_directory().to_path_buf(),
            bundle: self.engine.bundle(request).await?,
        };
        info!(%options, elapsed_ms = started.elapsed().as_millis() as u64, "build finished");
        Ok(build)
    }
}

/// A bundled graph plus the options it was built with.
///
/// Builds are never reused across targets; call [`Compiler::build`] once per
/// target.
pub struct Build {
    options: BuildOptions,
    bundle: Box<dyn EngineBundle>,
    warnings: WarningFilter,
    route_modules: RouteModuleIndex,
    emits_manifest: bool,
    output_dir: PathBuf,
    manifest_dir: PathBuf,
}

impl fmt::Debug for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Build")
            .field("options", &self.options)
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}

/// What [`Build::write`] put on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub files: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub output: BundleOutput,
}

impl Build {
    pub fn options(&self) -> BuildOptions {
        self.options
    }

    pub fn mode(&self) -> BuildMode {
        self.options.mode
    }

    pub fn target(&self) -> BuildTarget {
        self.options.target
    }

    /// The configured build directory for this target.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders the bundle in memory.
    ///
    /// Warnings the target filters out are dropped; the rest are logged and
    /// returned with the output.
    pub async fn generate(&mut self) -> Result<BundleOutput> {
        let mut output = self.bundle.generate().await?;
        output.warnings = self.warnings.apply(std::mem::take(&mut output.warnings));
        for warning in &output.warnings {
            warn!(code = %warning.code, build_target = %self.options.target, "{}", warning.message);
        }
        Ok(output)
    }

    /// Renders the bundle and writes it below `dir`.
    ///
    /// The target's manifest always goes to the server build directory, so a
    /// browser and a server build together leave both manifests side by side.
    pub async fn write(&mut self, dir: impl AsRef<Path>) -> Result<WriteReport> {
        let dir = dir.as_ref();
        let output = self.generate().await?;
        let files = write_output(&output, dir)?;

        let manifest = if self.emits_manifest {
            let manifest = AssetManifest::from_output(&output, &self.route_modules);
            Some(manifest.write_to(&self.manifest_dir, self.options.target.manifest_file_name())?)
        } else {
            None
        };

        info!(
            build_target = %self.options.target,
            dir = %dir.display(),
            files = files.len(),
            "wrote build"
        );
        Ok(WriteReport {
            files,
            manifest,
            output,
        })
    }

    /// [`Build::write`] to the configured directory for this target.
    pub async fn write_to_output_dir(&mut self) -> Result<WriteReport> {
        let dir = self.output_dir.clone();
        self.write(dir).await
    }
}
