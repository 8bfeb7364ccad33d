//! Configuration file watcher for hot reload of the candidate list.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ClientConfig;
use crate::fallback::FallbackDispatcher;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ClientConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ClientConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?path, "Config file change detected, reloading");
                        match load_config(&path) {
                            Ok(new_config) => {
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                tracing::error!(
                                    error = %e,
                                    "Failed to reload config, keeping current candidates"
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Apply reloaded candidate lists to `dispatcher` until the channel closes.
///
/// Only the candidate list is hot-reloadable; timeouts and logging keep
/// the values they were started with.
pub async fn apply_updates(
    dispatcher: Arc<FallbackDispatcher>,
    mut updates: mpsc::UnboundedReceiver<ClientConfig>,
) {
    while let Some(config) = updates.recv().await {
        if dispatcher.replace_all(config.candidates) {
            tracing::info!(
                candidates = ?dispatcher.candidates().to_vec(),
                "Candidate list reloaded"
            );
        }
    }
    tracing::debug!("Config update channel closed");
}
