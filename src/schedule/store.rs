//! The live schedule: one immutable snapshot behind a lock, swapped whole.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::index::{ScheduleSnapshot, ScheduleStats};
use super::ingest::{IngestError, ScheduleIngestor};

/// A snapshot together with where and when it was loaded.
#[derive(Debug, Clone)]
pub struct LoadedSchedule {
    pub snapshot: ScheduleSnapshot,
    pub source_path: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file produced rows and is now the live schedule.
    Replaced(ScheduleStats),
    /// Nothing recognizable; the previous schedule stays live.
    Empty,
}

pub struct ScheduleStore {
    current: RwLock<Option<Arc<LoadedSchedule>>>,
    ingestor: ScheduleIngestor,
}

impl Default for ScheduleStore {
    fn default() -> Self {
        ScheduleStore::new(ScheduleIngestor::default())
    }
}

impl ScheduleStore {
    pub fn new(ingestor: ScheduleIngestor) -> Self {
        ScheduleStore {
            current: RwLock::new(None),
            ingestor,
        }
    }

    pub fn ingestor(&self) -> &ScheduleIngestor {
        &self.ingestor
    }

    pub fn current(&self) -> Option<Arc<LoadedSchedule>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, schedule: LoadedSchedule) {
        let schedule = Arc::new(schedule);
        match self.current.write() {
            Ok(mut guard) => *guard = Some(schedule),
            Err(poisoned) => *poisoned.into_inner() = Some(schedule),
        }
    }

    /// Counts of the live schedule, zero when nothing is loaded.
    pub fn stats(&self) -> ScheduleStats {
        self.current()
            .map(|loaded| loaded.snapshot.stats())
            .unwrap_or_default()
    }

    /// Ingest `path` and publish it only when it produced rows.
    pub fn load_file(&self, path: &Path) -> Result<LoadOutcome, IngestError> {
        let rows = match self.ingestor.ingest_file(path) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(path = %path.display(), "schedule load failed, keeping previous: {err}");
                return Err(err);
            }
        };
        if rows.is_empty() {
            warn!(path = %path.display(), "schedule file produced no lessons, keeping previous");
            return Ok(LoadOutcome::Empty);
        }

        let snapshot = ScheduleSnapshot::build(rows);
        let stats = snapshot.stats();
        self.replace(LoadedSchedule {
            snapshot,
            source_path: Some(path.to_path_buf()),
            loaded_at: Utc::now(),
        });
        info!(
            path = %path.display(),
            groups = stats.groups,
            teachers = stats.teachers,
            lessons = stats.lessons,
            "schedule loaded"
        );
        Ok(LoadOutcome::Replaced(stats))
    }

    /// Load the newest workbook in `dir`; `Ok(None)` when there is none.
    pub fn load_latest_from_dir(&self, dir: &Path) -> Result<Option<LoadOutcome>, IngestError> {
        match latest_workbook(dir) {
            Some(path) => self.load_file(&path).map(Some),
            None => {
                info!(dir = %dir.display(), "no schedule workbook found");
                Ok(None)
            }
        }
    }
}

/// Greatest `*.xlsx` file name in `dir`, skipping office lock files (`~$...`).
pub fn latest_workbook(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                return false;
            };
            !name.starts_with("~$") && name.to_ascii_lowercase().ends_with(".xlsx")
        })
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{latest_workbook, LoadOutcome, ScheduleStore};
    use crate::schedule::ingest::ScheduleIngestor;

    fn store_in(dir: &std::path::Path) -> ScheduleStore {
        ScheduleStore::new(ScheduleIngestor::new(dir.join("preview.txt")))
    }

    #[test]
    fn nothing_loaded_reports_zero_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        assert!(store.current().is_none());
        assert_eq!(store.stats().lessons, 0);
    }

    #[test]
    fn empty_or_failed_load_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("good.csv");
        let junk = dir.path().join("junk.csv");
        fs::write(&good, "group,day,subject\nG1,Mon,Math\n").expect("fixture");
        fs::write(&junk, "a,b\n1,2\n").expect("fixture");

        let store = store_in(dir.path());
        let outcome = store.load_file(&good).expect("good file loads");
        assert!(matches!(outcome, LoadOutcome::Replaced(stats) if stats.lessons == 1));

        assert_eq!(store.load_file(&junk).expect("junk still reads"), LoadOutcome::Empty);
        assert!(store.load_file(&dir.path().join("missing.xlsx")).is_err());

        let current = store.current().expect("snapshot kept");
        assert_eq!(current.snapshot.total_rows(), 1);
        assert_eq!(current.source_path.as_deref(), Some(good.as_path()));
    }

    #[test]
    fn latest_workbook_skips_lock_files_and_other_types() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in [
            "schedule_20240101_080000.xlsx",
            "schedule_20240301_080000.xlsx",
            "~$schedule_20240901_080000.xlsx",
            "schedule_20250101_080000.csv",
        ] {
            fs::write(dir.path().join(name), b"").expect("fixture");
        }
        let latest = latest_workbook(dir.path()).expect("a workbook");
        assert_eq!(
            latest.file_name().and_then(|name| name.to_str()),
            Some("schedule_20240301_080000.xlsx")
        );
    }

    #[test]
    fn missing_directory_has_no_latest() {
        assert!(latest_workbook(std::path::Path::new("no/such/dir")).is_none());
    }
}
