//! # Directory Watcher
//!
//! File system monitoring for the tidy organizer. A [`DirectoryWatcher`]
//! observes one source directory and forwards every change as a
//! [`FileEvent`] over a tokio channel, so the organizer can react with a
//! fresh pass.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Directory Watcher                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  WatchConfig ──► DirectoryWatcher ──► FileEvent                 │
//! │                        │                  │                     │
//! │                        ▼                  ▼                     │
//! │                 notify backend        EventBatch                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod watcher;

pub use config::WatchConfig;
pub use error::{Result, WatcherError};
pub use event::{EventBatch, FileEvent, FileEventKind};
pub use watcher::DirectoryWatcher;
