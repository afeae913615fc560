// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system watcher for the persisted settings document.
//!
//! The watcher reports edits made to the document by other processes (an operator
//! with a text editor, a deployment tool) so the live tree can be reloaded.

use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ConfigWatcher};
use crate::service::Configuration;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Watches a single settings file.
///
/// The parent directory is watched rather than the file itself, so the file may be
/// created, replaced or renamed over. Bursts of events are collapsed: the callback
/// fires once the file has been quiet for the debounce delay.
///
/// # Examples
///
/// ```rust,no_run
/// use formcfg::adapters::{reload_on_change, FileWatcher, JsonFileStore};
/// use formcfg::ports::ConfigWatcher;
/// use formcfg::service::Configuration;
/// use std::sync::Arc;
///
/// # fn main() -> formcfg::domain::Result<()> {
/// let store = JsonFileStore::from_file("/etc/myapp/config.json");
/// let mut watcher = FileWatcher::new(store.file_path(), None)?;
/// let config = Arc::new(Configuration::new(Arc::new(store)));
///
/// watcher.watch(reload_on_change(Arc::clone(&config)))?;
///
/// // Later, stop watching
/// watcher.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileWatcher {
    file_path: PathBuf,
    debounce_delay: Duration,
    watcher: Option<RecommendedWatcher>,
    watch_thread: Option<JoinHandle<()>>,
    stop_tx: Option<Sender<()>>,
}

impl FileWatcher {
    /// Creates a watcher for `path`.
    ///
    /// The file itself need not exist yet, but its directory must.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the settings file
    /// * `debounce_delay` - Quiet period before the callback fires (default 500ms)
    pub fn new(path: impl AsRef<Path>, debounce_delay: Option<Duration>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| ConfigError::WatcherError {
            message: format!("Not a file path: {}", path.display()),
            source: None,
        })?;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        // Events carry resolved paths, so resolve the directory up front
        let dir = parent.canonicalize().map_err(|e| ConfigError::WatcherError {
            message: format!("Directory does not exist: {}", parent.display()),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            file_path: dir.join(file_name),
            debounce_delay: debounce_delay.unwrap_or(DEFAULT_DEBOUNCE),
            watcher: None,
            watch_thread: None,
            stop_tx: None,
        })
    }

    /// The resolved path being watched.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns `true` while watching.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }
}

fn is_relevant(event: &Event, file_path: &Path) -> bool {
    !matches!(event.kind, EventKind::Access(_)) && event.paths.iter().any(|p| p == file_path)
}

impl ConfigWatcher for FileWatcher {
    fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
        if self.watcher.is_some() {
            return Err(ConfigError::WatcherError {
                message: "Watcher is already running".to_string(),
                source: None,
            });
        }

        let (event_tx, event_rx) = channel::<notify::Result<Event>>();
        let (stop_tx, stop_rx) = channel::<()>();

        let mut watcher =
            RecommendedWatcher::new(event_tx, notify::Config::default()).map_err(|e| {
                ConfigError::WatcherError {
                    message: format!("Failed to create file watcher: {}", e),
                    source: Some(Box::new(e)),
                }
            })?;

        let watch_dir = self
            .file_path
            .parent()
            .ok_or_else(|| ConfigError::WatcherError {
                message: "Failed to get parent directory".to_string(),
                source: None,
            })?
            .to_path_buf();

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to start watching: {}", e),
                source: Some(Box::new(e)),
            })?;

        let file_path = self.file_path.clone();
        let debounce_delay = self.debounce_delay;

        let watch_thread = thread::Builder::new()
            .name("formcfg-watch".to_string())
            .spawn(move || {
                let mut pending: Option<Instant> = None;

                loop {
                    if stop_rx.try_recv().is_ok() {
                        break;
                    }

                    match event_rx.recv_timeout(POLL_INTERVAL) {
                        Ok(Ok(event)) if is_relevant(&event, &file_path) => {
                            pending = Some(Instant::now());
                        }
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => tracing::warn!("File watcher error: {}", e),
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }

                    if pending.is_some_and(|at| at.elapsed() >= debounce_delay) {
                        pending = None;
                        tracing::debug!("Settings file changed: {}", file_path.display());
                        callback(&file_path);
                    }
                }
            })
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to spawn watcher thread: {}", e),
                source: Some(Box::new(e)),
            })?;

        self.watcher = Some(watcher);
        self.stop_tx = Some(stop_tx);
        self.watch_thread = Some(watch_thread);

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(handle) = self.watch_thread.take() {
            handle.join().map_err(|_| ConfigError::WatcherError {
                message: "Failed to join watcher thread".to_string(),
                source: None,
            })?;
        }

        self.watcher = None;

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Builds a watcher callback that reloads `config`.
///
/// Reload failures (for example a half-written file) are logged by the
/// configuration and otherwise ignored; the next change triggers another attempt.
pub fn reload_on_change(config: Arc<Configuration>) -> ChangeCallback {
    Arc::new(move |path: &Path| {
        tracing::info!("Reloading settings after change to {}", path.display());
        let _ = config.reload();
    })
}
