//! # Tidy Core
//!
//! Moves stale files out of a source directory into destination folders
//! chosen by file extension.
//!
//! A pass is stateless: list the top level of the source, keep the files
//! whose modification time precedes `now - days_ago`, pick the first target
//! folder that lists the file's extension, create it if needed and rename
//! the file into it. The [`runner`] module wraps that pass in the three
//! execution modes: once, on a timer, or whenever the source changes.
//!
//! ```text
//! Config ──► Settings ──► Organizer::run_pass
//!                              │
//!                 scan ──► classify ──► rename
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod organizer;
pub mod runner;
pub mod scan;

pub use classify::{classify, cutoff, is_stale};
pub use config::{Config, ExecutionMode, Settings, TargetFolder};
pub use error::{ConfigError, OrganizeError, Result};
pub use organizer::{MovedFile, Organizer, PassReport};
pub use runner::{RunOptions, run_config, run_monitor, run_once, run_timer};
pub use scan::{SourceEntry, scan_source};
