//! Configuration for a watched source directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatcherError};

/// Capacity of the channel between the notify backend and consumers.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Configuration for a watched directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Path to the directory.
    pub path: PathBuf,

    /// Whether subdirectories are watched too.
    pub recursive: bool,

    /// Bound of the event channel.
    pub channel_capacity: usize,
}

impl WatchConfig {
    /// Create a new watch config. Only the top level is watched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Watch subdirectories as well.
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Set the event channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Check that the configured path is an existing directory.
    pub fn validate(&self) -> Result<()> {
        if !self.path.exists() {
            return Err(WatcherError::DirectoryNotFound(
                self.path.display().to_string(),
            ));
        }

        if !self.path.is_dir() {
            return Err(WatcherError::Config(format!(
                "Path is not a directory: {}",
                self.path.display()
            )));
        }

        if self.channel_capacity == 0 {
            return Err(WatcherError::Config(
                "channel capacity must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn recursive_mode(&self) -> notify::RecursiveMode {
        if self.recursive {
            notify::RecursiveMode::Recursive
        } else {
            notify::RecursiveMode::NonRecursive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_watch_config_defaults() {
        let config = WatchConfig::new("/home/user/Desktop");

        assert_eq!(config.path(), Path::new("/home/user/Desktop"));
        assert!(!config.recursive);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(config.recursive_mode(), notify::RecursiveMode::NonRecursive);
    }

    #[test]
    fn test_validate_missing_directory() {
        let config = WatchConfig::new("/nonexistent/path/12345");
        assert!(matches!(
            config.validate(),
            Err(WatcherError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let config = WatchConfig::new(&file);
        assert!(matches!(config.validate(), Err(WatcherError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let config = WatchConfig::new(temp_dir.path()).with_channel_capacity(0);
        assert!(matches!(config.validate(), Err(WatcherError::Config(_))));
    }
}
