//! Listing the top level of a source directory.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{OrganizeError, Result};

/// A non-directory entry found directly inside the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// Final path component exactly as on disk, reused as the destination
    /// name.
    pub file_name: OsString,

    /// Lowercased extension without the dot, if any.
    pub extension: Option<String>,

    /// Last modification time.
    pub modified: DateTime<Utc>,

    /// Size in bytes.
    pub len: u64,

    /// Dotfile, or carries the hidden attribute on Windows.
    pub hidden: bool,
}

impl SourceEntry {
    /// Build an entry from a path and its modification time.
    pub fn new(path: impl Into<PathBuf>, modified: DateTime<Utc>) -> Self {
        let path = path.into();
        let file_name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();

        Self {
            extension: extension_of(&path),
            hidden: is_dotfile(&file_name),
            file_name,
            path,
            modified,
            len: 0,
        }
    }

    /// Build an entry from a path and its metadata.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> std::io::Result<Self> {
        let mut entry = Self::new(path, DateTime::<Utc>::from(metadata.modified()?));
        entry.len = metadata.len();
        entry.hidden = entry.hidden || has_hidden_attribute(metadata);
        Ok(entry)
    }

    /// File name for log output.
    pub fn display_name(&self) -> Cow<'_, str> {
        self.file_name.to_string_lossy()
    }
}

/// Lowercased extension of `path`.
///
/// A name made of a dot and a single word, such as `.txt`, counts that word
/// as its extension.
pub fn extension_of(path: &Path) -> Option<String> {
    let ext = match path.extension() {
        Some(ext) => ext.to_str()?,
        None => path
            .file_name()?
            .to_str()?
            .strip_prefix('.')
            .filter(|rest| !rest.contains('.'))?,
    };

    (!ext.is_empty()).then(|| ext.to_lowercase())
}

fn is_dotfile(file_name: &OsStr) -> bool {
    file_name.as_encoded_bytes().first() == Some(&b'.')
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: &Metadata) -> bool {
    false
}

/// List the files directly inside `dir`, skipping subdirectories.
///
/// Entries whose metadata cannot be read are logged and left out; failing to
/// read `dir` itself is an error.
pub fn scan_source(dir: &Path) -> Result<Vec<SourceEntry>> {
    if !dir.is_dir() {
        return Err(OrganizeError::SourceNotFound(dir.to_path_buf()));
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // Depth 0 is the source directory itself.
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let source_entry = match entry
            .metadata()
            .map_err(std::io::Error::from)
            .and_then(|metadata| SourceEntry::from_metadata(entry.path(), &metadata))
        {
            Ok(source_entry) => source_entry,
            Err(e) => {
                warn!("Failed to get file info for {}: {e}", entry.path().display());
                continue;
            }
        };

        entries.push(source_entry);
    }

    debug!("Scanned {} files in {}", entries.len(), dir.display());
    Ok(entries)
}
