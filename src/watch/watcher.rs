// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::{
    Config, Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::model::WatchSection;
use crate::watch::filter::WatchFilter;

/// Events sent from the watcher into the main run loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A watched path changed (create/modify/remove) and survived the
    /// ignore filter. The path is relative to the project root, with
    /// forward slashes.
    PathChanged { path: String },
    /// Ctrl-C or equivalent; the run loop should exit.
    ShutdownRequested,
}

/// Backend selection and tuning for the watcher.
#[derive(Debug, Clone)]
pub struct WatcherOptions {
    /// Use interval-based polling instead of native OS file events.
    pub use_polling: bool,
    /// Re-stat interval for the polling backend.
    pub poll_interval: Duration,
}

impl WatcherOptions {
    /// Derive watcher options from the `[server.watch]` config section.
    pub fn from_config(watch: &WatchSection) -> Self {
        Self {
            use_polling: watch.use_polling,
            poll_interval: Duration::from_millis(watch.poll_interval_ms),
        }
    }
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            use_polling: false,
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying notify backend is kept alive for as
/// long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: Box<dyn Watcher + Send>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes the given `root` directory
/// recursively and sends `WatchEvent::PathChanged` for every changed path
/// the ignore filter lets through.
///
/// - `root` is the project root against which paths are relativized.
/// - `filter` decides per path whether its notifications are suppressed.
/// - `options.use_polling` selects `PollWatcher` over the native backend.
/// - `runtime_tx` is the channel into the main run loop.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    filter: WatchFilter,
    options: &WatcherOptions,
    runtime_tx: mpsc::Sender<WatchEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root
        .canonicalize()
        .unwrap_or_else(|_| root.clone()); // best-effort

    let filter = Arc::new(filter);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let handler = {
        let event_tx = event_tx.clone();
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("devwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("devwatch: file watch error: {err}");
            }
        }
    };

    let mut watcher: Box<dyn Watcher + Send> = if options.use_polling {
        let config = Config::default().with_poll_interval(options.poll_interval);
        Box::new(PollWatcher::new(handler, config)?)
    } else {
        Box::new(RecommendedWatcher::new(handler, Config::default())?)
    };

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(
        polling = options.use_polling,
        "file watcher started on {:?}", root
    );

    // Async task that consumes notify events and forwards surviving paths.
    let async_root = root.clone();
    let async_filter = Arc::clone(&filter);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_relevant_event(&event.kind) {
                continue;
            }
            debug!("received notify event: {:?}", event);

            for path in &event.paths {
                let rel_str = relative_str(&async_root, path);

                if async_filter.is_ignored(&rel_str) {
                    debug!(path = %rel_str, "change suppressed by ignore rules");
                    continue;
                }

                if let Err(err) = runtime_tx
                    .send(WatchEvent::PathChanged {
                        path: rel_str.clone(),
                    })
                    .await
                {
                    warn!("failed to send WatchEvent::PathChanged: {err}");
                    // If the runtime channel is closed, there's no point
                    // keeping the watcher loop alive.
                    return;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Only content-affecting events matter for the dev server; access events
/// in particular are noisy on some platforms.
fn is_relevant_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Paths outside `root` (possible with symlinks) are kept absolute so the
/// ignore rules still see them.
fn relative_str(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
