//! TOML configuration: one `[[settings]]` block per source directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Interval used when a block omits `execution_interval`.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Independent organizing jobs, processed in order.
    #[serde(default)]
    pub settings: Vec<Settings>,
}

/// One organizing job: a source directory and where its files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory to clean up. Empty means the user's desktop.
    #[serde(default)]
    pub source_path: PathBuf,

    /// Files last modified more than this many days ago are moved.
    pub days_ago: u32,

    /// `once`, `monitor` or `timer`.
    #[serde(default = "default_mode")]
    pub execution_mode: String,

    /// Seconds between passes in timer mode.
    #[serde(default = "default_interval")]
    pub execution_interval: u64,

    /// Leave hidden files in place.
    #[serde(default)]
    pub skip_hidden: bool,

    /// Leave zero-length files in place.
    #[serde(default)]
    pub skip_empty: bool,

    /// Destinations, checked in order.
    #[serde(default)]
    pub target_folders: Vec<TargetFolder>,
}

/// A destination folder and the extensions it collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFolder {
    pub target_folder: PathBuf,
    pub file_types: Vec<String>,
}

/// How a settings block is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// A single pass.
    Once,

    /// A pass for every change in the source directory.
    Monitor,

    /// A pass every `execution_interval` seconds.
    Timer,
}

fn default_mode() -> String {
    ExecutionMode::Once.to_string()
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Config {
    /// Load the configuration at `path`, writing the default one there first
    /// if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::write_default(path)?;
            info!("Default configuration file created at {}", path.display());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Write the default configuration to `path`, creating parent folders.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        Self::write_default_with_home(path, dirs::home_dir())
    }

    /// Backup folders are absolute, so nothing is written without a home
    /// directory.
    fn write_default_with_home(path: &Path, home: Option<PathBuf>) -> Result<(), ConfigError> {
        let home = home.ok_or(ConfigError::NoHome)?;
        let rendered = toml::to_string(&Self::default_for_home(&home))?;

        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, rendered).map_err(io_err)
    }

    /// The configuration written on first run. Backups live under
    /// `<home>/Backup`.
    pub fn default_for_home(home: &Path) -> Self {
        let backup = home.join("Backup");
        let target = |name: &str, types: &[&str]| TargetFolder {
            target_folder: backup.join(name),
            file_types: types.iter().map(|t| (*t).to_string()).collect(),
        };

        Self {
            settings: vec![
                Settings {
                    source_path: PathBuf::new(),
                    days_ago: 3,
                    execution_mode: ExecutionMode::Once.to_string(),
                    execution_interval: 60,
                    skip_hidden: false,
                    skip_empty: false,
                    target_folders: vec![
                        target("Documents", &["txt", "xlsx", "docx"]),
                        target("Videos", &["mp4", "avi"]),
                    ],
                },
                Settings {
                    source_path: PathBuf::new(),
                    days_ago: 5,
                    execution_mode: ExecutionMode::Monitor.to_string(),
                    execution_interval: 120,
                    skip_hidden: false,
                    skip_empty: false,
                    target_folders: vec![
                        target("Pictures", &["jpg", "png", "gif"]),
                        target("Music", &["mp3", "wav"]),
                    ],
                },
            ],
        }
    }
}

impl Settings {
    /// Parse `execution_mode`.
    pub fn mode(&self) -> Result<ExecutionMode, ConfigError> {
        self.execution_mode.parse()
    }

    /// Source directory, with an empty path replaced by the desktop.
    pub fn resolve_source(&self) -> Result<PathBuf, ConfigError> {
        if self.source_path.as_os_str().is_empty() {
            desktop_dir()
        } else {
            Ok(self.source_path.clone())
        }
    }

    /// Timer period.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.execution_interval)
    }
}

impl TargetFolder {
    /// Whether this folder collects files with the (lowercase, dotless)
    /// extension `ext`.
    pub fn accepts(&self, ext: &str) -> bool {
        self.file_types
            .iter()
            .any(|ft| normalize_extension(ft) == ext)
    }
}

/// Lowercase an extension and drop surrounding whitespace and one leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    trimmed
        .strip_prefix('.')
        .unwrap_or(trimmed)
        .to_lowercase()
}

/// The current user's desktop directory.
pub fn desktop_dir() -> Result<PathBuf, ConfigError> {
    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .ok_or(ConfigError::NoDesktop)
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "monitor" => Ok(Self::Monitor),
            "timer" => Ok(Self::Timer),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Once => "once",
            Self::Monitor => "monitor",
            Self::Timer => "timer",
        };
        f.write_str(name)
    }
}
