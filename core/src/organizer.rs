//! The organizing pass shared by every execution mode.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::classify::{classify, cutoff, is_stale};
use crate::config::{Settings, TargetFolder};
use crate::error::{OrganizeError, Result};
use crate::scan::{SourceEntry, scan_source};

/// Moves stale files from one source directory into target folders.
#[derive(Debug, Clone)]
pub struct Organizer {
    source: PathBuf,
    days_ago: u32,
    targets: Vec<TargetFolder>,
    skip_hidden: bool,
    skip_empty: bool,
}

/// A file that was moved during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Files seen at the top level of the source.
    pub scanned: usize,

    /// Hidden or empty files left alone by the organizer's filters.
    pub skipped: usize,

    /// Files modified recently enough to stay.
    pub fresh: usize,

    /// Stale files no target folder collects.
    pub unmatched: usize,

    /// Files moved into a target folder.
    pub moved: Vec<MovedFile>,

    /// Stale, matched files that could not be moved.
    pub failed: usize,
}

impl Organizer {
    /// Create an organizer for `source`.
    pub fn new(source: impl Into<PathBuf>, days_ago: u32, targets: Vec<TargetFolder>) -> Self {
        Self {
            source: source.into(),
            days_ago,
            targets,
            skip_hidden: false,
            skip_empty: false,
        }
    }

    /// Leave hidden files where they are.
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Leave zero-length files where they are.
    pub fn with_skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    /// Create an organizer from a settings block, resolving an empty source
    /// to the desktop.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            settings.resolve_source()?,
            settings.days_ago,
            settings.target_folders.clone(),
        )
        .with_skip_hidden(settings.skip_hidden)
        .with_skip_empty(settings.skip_empty))
    }

    /// The source directory.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Fail with [`OrganizeError::SourceNotFound`] unless the source exists.
    pub fn ensure_source(&self) -> Result<()> {
        if self.source.exists() {
            Ok(())
        } else {
            Err(OrganizeError::SourceNotFound(self.source.clone()))
        }
    }

    /// Run one pass against the current time.
    pub fn run_pass(&self) -> Result<PassReport> {
        self.run_pass_at(Utc::now())
    }

    /// Run one pass treating `now` as the current time.
    ///
    /// Per-file failures are logged and counted; only a missing or
    /// unreadable source aborts the pass.
    pub fn run_pass_at(&self, now: DateTime<Utc>) -> Result<PassReport> {
        self.ensure_source()?;

        let cutoff = cutoff(self.days_ago, now);
        let entries = scan_source(&self.source)?;

        let mut report = PassReport {
            scanned: entries.len(),
            ..Default::default()
        };

        for entry in &entries {
            if self.filters_out(entry) {
                debug!("Skipping {}", entry.path.display());
                report.skipped += 1;
                continue;
            }

            if !is_stale(entry, cutoff) {
                report.fresh += 1;
                continue;
            }

            let Some(target) = classify(entry, &self.targets) else {
                report.unmatched += 1;
                continue;
            };

            match move_into(entry, &target.target_folder) {
                Ok(to) => {
                    debug!("Moved {} -> {}", entry.display_name(), to.display());
                    report.moved.push(MovedFile {
                        from: entry.path.clone(),
                        to,
                    });
                }
                Err(e) => {
                    error!(
                        "Failed to move file {} into {}: {e}",
                        entry.path.display(),
                        target.target_folder.display()
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            source = %self.source.display(),
            scanned = report.scanned,
            moved = report.moved.len(),
            failed = report.failed,
            "Organize pass finished"
        );

        Ok(report)
    }

    fn filters_out(&self, entry: &SourceEntry) -> bool {
        (self.skip_hidden && entry.hidden) || (self.skip_empty && entry.len == 0)
    }
}

/// Create `folder` if needed and rename the entry into it.
fn move_into(entry: &SourceEntry, folder: &Path) -> std::io::Result<PathBuf> {
    if !folder.exists() {
        fs::create_dir_all(folder)?;
        info!("Created target folder: {}", folder.display());
    }

    let to = folder.join(&entry.file_name);
    fs::rename(&entry.path, &to)?;
    Ok(to)
}
