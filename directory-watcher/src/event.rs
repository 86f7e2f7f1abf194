//! File events from directory watching.

use std::path::PathBuf;

use tokio::sync::mpsc;

/// A change reported for one path in the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub kind: FileEventKind,
    pub path: PathBuf,
}

impl FileEvent {
    pub fn new(kind: FileEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// What happened to the path. Only reads are told apart from changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Created,
    Modified,
    Removed,
    Renamed,
    /// Opened or read without being changed.
    Accessed,
    Other,
}

impl From<notify::EventKind> for FileEventKind {
    fn from(kind: notify::EventKind) -> Self {
        use notify::event::{AccessKind, AccessMode, ModifyKind};

        match kind {
            notify::EventKind::Create(_) => Self::Created,
            notify::EventKind::Modify(ModifyKind::Name(_)) => Self::Renamed,
            notify::EventKind::Modify(_) => Self::Modified,
            notify::EventKind::Remove(_) => Self::Removed,
            // inotify reports finished writes as a close.
            notify::EventKind::Access(AccessKind::Close(AccessMode::Write)) => Self::Modified,
            notify::EventKind::Access(_) => Self::Accessed,
            _ => Self::Other,
        }
    }
}

/// Events handled by a single organizer pass.
#[derive(Debug, Clone)]
pub struct EventBatch {
    events: Vec<FileEvent>,
}

impl EventBatch {
    /// Start a batch from a received event.
    pub fn from_event(event: FileEvent) -> Self {
        Self {
            events: vec![event],
        }
    }

    /// Pull every event already queued on `rx` without waiting.
    ///
    /// Returns the number of events added.
    pub fn drain_ready(&mut self, rx: &mut mpsc::Receiver<FileEvent>) -> usize {
        let before = self.events.len();
        while let Ok(event) = rx.try_recv() {
            self.events.push(event);
        }
        self.events.len() - before
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Whether any event in the batch is more than a read.
    pub fn has_changes(&self) -> bool {
        self.events
            .iter()
            .any(|e| e.kind != FileEventKind::Accessed)
    }

    /// The event that opened the batch.
    pub fn first(&self) -> &FileEvent {
        &self.events[0]
    }
}
