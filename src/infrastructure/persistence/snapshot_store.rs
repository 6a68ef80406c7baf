use crate::domain::errors::SnapshotError;
use crate::domain::snapshot::Snapshot;
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Written(PathBuf),
    /// A snapshot already existed for that date and was left untouched
    Skipped(PathBuf),
}

impl SnapshotOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Skipped(path) => path,
        }
    }
}

/// Daily snapshot files laid out as `<log_dir>/YYYY/MM/DD.json`.
///
/// Writers are not coordinated: two processes writing the same date race and
/// the last rename wins.
pub struct SnapshotStore {
    log_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.log_dir
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}.json", date.day()))
    }

    /// Whether a snapshot for `date` is already stored
    pub fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).exists()
    }

    pub fn write(&self, snapshot: &Snapshot, overwrite: bool) -> Result<SnapshotOutcome, SnapshotError> {
        let path = self.path_for(snapshot.date);

        if self.exists(snapshot.date) && !overwrite {
            info!("Snapshot already exists at {:?}, skipping", path);
            return Ok(SnapshotOutcome::Skipped(path));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(snapshot)?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|source| SnapshotError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &path).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;

        info!("Saved snapshot to {:?}", path);
        Ok(SnapshotOutcome::Written(path))
    }

    pub fn load(&self, date: NaiveDate) -> Result<Snapshot, SnapshotError> {
        let path = self.path_for(date);
        if !path.exists() {
            return Err(SnapshotError::NotFound { path });
        }

        let content = fs::read_to_string(&path).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn snapshot_at(hour: u32) -> Snapshot {
        let now = Utc.with_ymd_and_hms(2024, 2, 9, hour, 0, 0).unwrap();
        Snapshot::new(now, Vec::new(), Vec::new())
    }

    #[test]
    fn test_path_layout_is_zero_padded() {
        let store = SnapshotStore::new("logs");
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(store.path_for(date), PathBuf::from("logs/2024/02/09.json"));
    }

    #[test]
    fn test_second_write_is_skipped_without_overwrite() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let first = store.write(&snapshot_at(1), false).unwrap();
        assert!(matches!(first, SnapshotOutcome::Written(_)));
        let before = fs::read(first.path()).unwrap();

        let second = store.write(&snapshot_at(2), false).unwrap();
        assert_eq!(second, SnapshotOutcome::Skipped(first.path().to_path_buf()));
        assert_eq!(fs::read(second.path()).unwrap(), before);
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.write(&snapshot_at(1), false).unwrap();
        let outcome = store.write(&snapshot_at(2), true).unwrap();
        assert!(matches!(outcome, SnapshotOutcome::Written(_)));

        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let loaded = store.load(date).unwrap();
        assert_eq!(loaded.generated_at_iso, "2024-02-09T02:00:00Z");
        assert!(!outcome.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_exists_tracks_written_dates() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();

        assert!(!store.exists(date));
        store.write(&snapshot_at(1), false).unwrap();
        assert!(store.exists(date));
        assert!(!store.exists(date.succ_opt().unwrap()));
    }

    #[test]
    fn test_load_missing_date() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let err = store
            .load(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound { .. }));
    }
}
