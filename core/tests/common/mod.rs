//! Helpers shared by the organizer integration tests.

#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tidy_core::TargetFolder;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Create `name` inside `dir` with a modification time `days` days ago.
/// The file holds its own path, so it is never empty.
pub fn aged_file(dir: &Path, name: impl AsRef<Path>, days: u64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, path.as_os_str().as_encoded_bytes()).unwrap();

    let mtime = SystemTime::now() - DAY * u32::try_from(days).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();

    path
}

/// A target folder collecting `types`.
pub fn target(dir: &Path, types: &[&str]) -> TargetFolder {
    TargetFolder {
        target_folder: dir.to_path_buf(),
        file_types: types.iter().map(|t| (*t).to_string()).collect(),
    }
}

/// Poll `check` until it holds or `timeout` elapses.
pub async fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    check()
}
