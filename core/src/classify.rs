//! Staleness and destination selection.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::TargetFolder;
use crate::scan::SourceEntry;

/// Files modified before this instant are stale.
///
/// Saturates at the earliest representable time, so absurd thresholds make
/// nothing stale instead of overflowing.
pub fn cutoff(days_ago: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days_ago))
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whether `entry` was last modified strictly before `cutoff`.
pub fn is_stale(entry: &SourceEntry, cutoff: DateTime<Utc>) -> bool {
    entry.modified < cutoff
}

/// The first target folder collecting the entry's extension.
pub fn classify<'a>(entry: &SourceEntry, targets: &'a [TargetFolder]) -> Option<&'a TargetFolder> {
    let ext = entry.extension.as_deref()?;
    targets.iter().find(|target| target.accepts(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn target(dir: &str, types: &[&str]) -> TargetFolder {
        TargetFolder {
            target_folder: PathBuf::from(dir),
            file_types: types.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn test_cutoff_subtracts_days() {
        let now = DateTime::parse_from_rfc3339("2024-09-19T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let expected = DateTime::parse_from_rfc3339("2024-09-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(cutoff(3, now), expected);
        assert_eq!(cutoff(0, now), now);
    }

    #[test]
    fn test_cutoff_saturates() {
        let now = Utc::now();
        assert_eq!(cutoff(u32::MAX, now), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_stale_is_strictly_before() {
        let now = Utc::now();
        let entry = SourceEntry::new("/src/a.txt", now);

        assert!(!is_stale(&entry, now));
        assert!(is_stale(&entry, now + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_first_matching_target_wins() {
        let targets = vec![
            target("/backup/docs", &["txt", "docx"]),
            target("/backup/text", &["txt"]),
        ];
        let entry = SourceEntry::new("/src/Notes.TXT", Utc::now());

        let chosen = classify(&entry, &targets).unwrap();
        assert_eq!(chosen.target_folder, PathBuf::from("/backup/docs"));
    }

    #[test]
    fn test_unmatched_and_extensionless_entries() {
        let targets = vec![target("/backup/docs", &["txt"])];

        let video = SourceEntry::new("/src/clip.mp4", Utc::now());
        assert!(classify(&video, &targets).is_none());

        let bare = SourceEntry::new("/src/txt", Utc::now());
        assert!(classify(&bare, &targets).is_none());
    }
}
