//! Directory watcher implementation.

use notify::{RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::WatchConfig;
use crate::error::{Result, WatcherError};
use crate::event::{FileEvent, FileEventKind};

/// Watches one directory and forwards its changes as [`FileEvent`]s.
pub struct DirectoryWatcher {
    /// What to watch.
    config: WatchConfig,

    /// Internal notify watcher, present while running.
    watcher: Option<RecommendedWatcher>,
}

impl DirectoryWatcher {
    /// Create a new directory watcher for an existing directory.
    pub fn new(config: WatchConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            watcher: None,
        })
    }

    /// Start watching. Events arrive on the returned receiver until
    /// [`DirectoryWatcher::stop`] is called or the watcher is dropped.
    pub fn start(&mut self) -> Result<mpsc::Receiver<FileEvent>> {
        if self.watcher.is_some() {
            return Err(WatcherError::AlreadyWatching(
                self.config.path.display().to_string(),
            ));
        }

        let (event_tx, event_rx) = mpsc::channel(self.config.channel_capacity);

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    let kind = FileEventKind::from(event.kind);

                    for path in event.paths {
                        // Receiver gone means the consumer shut down.
                        if event_tx.blocking_send(FileEvent::new(kind, path)).is_err() {
                            debug!("Dropping file event: receiver closed");
                            return;
                        }
                    }
                }
                Err(e) => {
                    error!("Watch error: {e}");
                }
            },
        )?;

        watcher.watch(&self.config.path, self.config.recursive_mode())?;
        self.watcher = Some(watcher);

        info!("Started watching: {}", self.config.path.display());
        Ok(event_rx)
    }

    /// Stop watching and close the event channel.
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(e) = watcher.unwatch(&self.config.path) {
                warn!("Failed to unwatch {}: {e}", self.config.path.display());
            }
            info!("Stopped watching: {}", self.config.path.display());
        }
    }

    /// Check if the watcher is running.
    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// The watch configuration.
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_watcher_creation() {
        let temp_dir = TempDir::new().unwrap();
        let watcher = DirectoryWatcher::new(WatchConfig::new(temp_dir.path())).unwrap();
        assert!(!watcher.is_running());
    }

    #[test]
    fn test_nonexistent_directory() {
        let result = DirectoryWatcher::new(WatchConfig::new("/nonexistent/path/12345"));
        assert!(matches!(result, Err(WatcherError::DirectoryNotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_start_twice_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut watcher = DirectoryWatcher::new(WatchConfig::new(temp_dir.path())).unwrap();

        let _rx = watcher.start().unwrap();
        assert!(watcher.is_running());
        assert!(matches!(
            watcher.start(),
            Err(WatcherError::AlreadyWatching(_))
        ));

        watcher.stop();
        assert!(!watcher.is_running());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_receives_event_for_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut watcher = DirectoryWatcher::new(WatchConfig::new(temp_dir.path())).unwrap();
        let mut rx = watcher.start().unwrap();

        std::fs::write(temp_dir.path().join("new.txt"), "hello").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(event.path.ends_with("new.txt") || event.path == temp_dir.path());

        watcher.stop();
    }
}
