//! Watch mode.
//!
//! A watcher on the app directory schedules rebuilds through the same path as
//! [`Compiler::build`]. Every rebuild emits [`WatchEvent::BundleStart`] followed
//! by either [`WatchEvent::BundleEnd`] or [`WatchEvent::Error`]; builds run one
//! at a time on a single task, so events arrive in the order they happen.
//! Every rebuild after the first reloads the configuration and rescans the
//! route directories, so new and deleted route files take effect.
//! Nothing is written to disk; the `on_build_end` callback receives the
//! [`Build`] and decides whether to generate or write it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use remix_config::{ResolvedConfig, RouteSource};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::build::{Build, Compiler};
use crate::target::BuildOptions;
use crate::{Error, Result};

/// Quiet period after a change before a rebuild starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

type StartCallback = Box<dyn Fn() + Send + Sync>;
type EndCallback = Box<dyn Fn(Build) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(Error) + Send + Sync>;

/// Lifecycle event of a watched build.
#[derive(Debug)]
pub enum WatchEvent {
    BundleStart,
    BundleEnd(Build),
    Error(Error),
}

pub struct WatchOptions {
    pub build: BuildOptions,
    pub debounce: Duration,
    route_source: Option<Arc<dyn RouteSource>>,
    on_build_start: Option<StartCallback>,
    on_build_end: Option<EndCallback>,
    on_error: Option<ErrorCallback>,
}

impl WatchOptions {
    pub fn new(build: BuildOptions) -> Self {
        Self {
            build,
            debounce: DEFAULT_DEBOUNCE,
            route_source: None,
            on_build_start: None,
            on_build_end: None,
            on_error: None,
        }
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Programmatic routes to merge in whenever the configuration is reloaded.
    pub fn route_source(mut self, source: Arc<dyn RouteSource>) -> Self {
        self.route_source = Some(source);
        self
    }

    pub fn on_build_start(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_build_start = Some(Box::new(callback));
        self
    }

    pub fn on_build_end(mut self, callback: impl Fn(Build) + Send + Sync + 'static) -> Self {
        self.on_build_end = Some(Box::new(callback));
        self
    }

    /// Receives build errors. Without it errors are logged and watching continues.
    pub fn on_error(mut self, callback: impl Fn(Error) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    fn dispatch(&self, event: WatchEvent) {
        match event {
            WatchEvent::BundleStart => {
                if let Some(callback) = &self.on_build_start {
                    callback();
                }
            }
            WatchEvent::BundleEnd(build) => {
                if let Some(callback) = &self.on_build_end {
                    callback(build);
                }
            }
            WatchEvent::Error(err) => match &self.on_error {
                Some(callback) => callback(err),
                None => error!(build_target = %self.build.target, error = %err, "watch build failed"),
            },
        }
    }
}

impl fmt::Debug for WatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchOptions")
            .field("build", &self.build)
            .field("debounce", &self.debounce)
            .field("route_source", &self.route_source.is_some())
            .field("on_build_start", &self.on_build_start.is_some())
            .field("on_build_end", &self.on_build_end.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Stops a watch started with [`Compiler::watch`].
///
/// Dropping the handle closes it.
pub struct WatchHandle {
    watcher: Mutex<Option<RecommendedWatcher>>,
    close: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WatchHandle {
    /// Stops watching. A build already running is allowed to finish and its
    /// events are still delivered; no further builds start. Safe to call more
    /// than once.
    pub fn close(&self) {
        let watcher = self.watcher.lock().take();
        let close = self.close.lock().take();
        if watcher.is_none() && close.is_none() {
            return;
        }
        drop(watcher);
        if let Some(close) = close {
            let _ = close.send(());
        }
        debug!("watch closed");
    }

    pub fn is_closed(&self) -> bool {
        self.close.lock().is_none()
    }

    /// Closes the watch and waits for an in-flight build to settle.
    pub async fn close_and_wait(self) {
        self.close();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!(error = %e, "watch task failed");
            }
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Compiler {
    /// Builds once, then rebuilds whenever a file under the app directory changes.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails when no runtime is available or the directory watcher cannot be
    /// installed. Build failures never end the watch; they go to `on_error`.
    pub fn watch(&self, config: Arc<ResolvedConfig>, options: WatchOptions) -> Result<WatchHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Io(std::io::Error::other(format!("watch needs a Tokio runtime: {e}"))))?;

        let app_dir = config.app_directory().to_path_buf();
        let roots: Vec<PathBuf> = match app_dir.canonicalize() {
            Ok(canonical) if canonical != app_dir => vec![app_dir.clone(), canonical],
            _ => vec![app_dir.clone()],
        };
        let (changes_tx, changes_rx) = mpsc::channel(16);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_relevant(&event, &roots) => {
                // A full channel already has a rebuild pending.
                let _ = changes_tx.try_send(());
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "file watcher error"),
        })?;
        watcher.watch(&app_dir, RecursiveMode::Recursive)?;
        debug!(dir = %app_dir.display(), build_target = %options.build.target, "watching");

        let (close_tx, close_rx) = oneshot::channel();
        let session = Session {
            compiler: self.clone(),
            config,
            options,
        };
        let task = runtime.spawn(session.run(changes_rx, close_rx));

        Ok(WatchHandle {
            watcher: Mutex::new(Some(watcher)),
            close: Mutex::new(Some(close_tx)),
            task: Mutex::new(Some(task)),
        })
    }
}

struct Session {
    compiler: Compiler,
    config: Arc<ResolvedConfig>,
    options: WatchOptions,
}

impl Session {
    async fn run(mut self, mut changes: mpsc::Receiver<()>, mut close: oneshot::Receiver<()>) {
        self.build().await;
        loop {
            tokio::select! {
                biased;
                _ = &mut close => break,
                change = changes.recv() => {
                    if change.is_none() {
                        break;
                    }
                    tokio::time::sleep(self.options.debounce).await;
                    while changes.try_recv().is_ok() {}
                    if !matches!(close.try_recv(), Err(oneshot::error::TryRecvError::Empty)) {
                        break;
                    }
                    self.rebuild().await;
                }
            }
        }
        debug!(build_target = %self.options.build.target, "watch loop stopped");
    }

    /// Reloads the configuration, then builds. A configuration error is
    /// reported like a build error and the previous snapshot is kept.
    async fn rebuild(&mut self) {
        let source = self.options.route_source.as_deref();
        match self.config.reload(source).await {
            Ok(config) => self.config = Arc::new(config),
            Err(e) => {
                self.options.dispatch(WatchEvent::BundleStart);
                self.options.dispatch(WatchEvent::Error(e.into()));
                return;
            }
        }
        self.build().await;
    }

    async fn build(&self) {
        self.options.dispatch(WatchEvent::BundleStart);
        let event = match self.compiler.build(&self.config, self.options.build).await {
            Ok(build) => WatchEvent::BundleEnd(build),
            Err(e) => WatchEvent::Error(e),
        };
        self.options.dispatch(event);
    }
}

/// Changes that should trigger a rebuild: content events outside hidden paths.
fn is_relevant(event: &Event, roots: &[PathBuf]) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| !is_hidden(path, roots))
}

/// Hidden below whichever root `path` lives under; paths outside every root
/// are never hidden.
fn is_hidden(path: &Path, roots: &[PathBuf]) -> bool {
    let Some(relative) = roots.iter().find_map(|root| path.strip_prefix(root).ok()) else {
        return false;
    };
    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn content_changes_trigger_rebuilds() {
        let root = &[PathBuf::from("/project/app")];
        assert!(is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/project/app/routes/index.tsx"),
            root
        ));
        assert!(is_relevant(
            &event(EventKind::Create(CreateKind::File), "/project/app/routes/new.tsx"),
            root
        ));
    }

    #[test]
    fn access_and_hidden_paths_are_ignored() {
        let root = &[PathBuf::from("/project/app")];
        assert!(!is_relevant(
            &event(EventKind::Access(AccessKind::Any), "/project/app/root.tsx"),
            root
        ));
        assert!(!is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/project/app/.cache/x.json"),
            root
        ));
        assert!(!is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/project/app/routes/.index.tsx.swp"),
            root
        ));
    }

    #[test]
    fn hidden_parents_above_the_root_do_not_count() {
        let roots = [PathBuf::from("/tmp/app"), PathBuf::from("/home/me/.projects/app")];
        assert!(!is_hidden(Path::new("/home/me/.projects/app/root.tsx"), &roots));
        assert!(is_hidden(Path::new("/tmp/app/.git/HEAD"), &roots));
    }
}
