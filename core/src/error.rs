//! Error types for the organizer.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for organizer operations.
pub type Result<T> = std::result::Result<T, OrganizeError>;

/// Errors raised while loading or interpreting the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the configuration file failed.
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to decode config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The default configuration could not be rendered.
    #[error("failed to encode config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Unknown `execution_mode` value.
    #[error("invalid execution mode {0:?}: set execution_mode to once, monitor, or timer")]
    InvalidMode(String),

    /// Timer mode with a zero interval.
    #[error("execution_interval must be greater than zero for timer mode")]
    ZeroInterval,

    /// Timer interval beyond what the clock can schedule.
    #[error("execution_interval is too large: {0} seconds")]
    IntervalTooLarge(u64),

    /// No desktop directory to fall back on for an empty source path.
    #[error("could not determine the desktop directory")]
    NoDesktop,

    /// No home directory to place the default backup folders under.
    #[error("could not determine the home directory for the default config")]
    NoHome,
}

/// Errors that can occur while organizing files.
#[derive(Error, Debug)]
pub enum OrganizeError {
    /// The source directory does not exist.
    #[error("source directory does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Directory listing failed.
    #[error("failed to read directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory watcher error.
    #[error("watcher error: {0}")]
    Watcher(#[from] tidy_directory_watcher::WatcherError),

    /// A background pass or mode task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
