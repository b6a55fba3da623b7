//! Layout detection: an ordered list of extractors, first non-empty result wins.
//! When every extractor comes back empty a bounded preview of the sheet is
//! written for a human to look at, and the ingest still succeeds with no rows.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::flat::FlatTableExtractor;
use super::matrix::MatrixExtractor;
use super::row::NormalizedRow;
use crate::sheet::{load_grid, CellGrid, LoadError};

pub const DEFAULT_PREVIEW_PATH: &str = "data/sheet_preview.txt";
pub const PREVIEW_MAX_ROWS: usize = 60;
pub const PREVIEW_MAX_COLS: usize = 30;

/// One way of reading lessons out of a sheet. An empty result means "not this layout".
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, grid: &dyn CellGrid) -> Vec<NormalizedRow>;
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Load(#[from] LoadError),
}

pub struct ScheduleIngestor {
    extractors: Vec<Box<dyn Extractor>>,
    preview_path: PathBuf,
}

impl Default for ScheduleIngestor {
    fn default() -> Self {
        ScheduleIngestor::new(DEFAULT_PREVIEW_PATH)
    }
}

impl ScheduleIngestor {
    /// Flat table first, matrix second.
    pub fn new(preview_path: impl Into<PathBuf>) -> Self {
        ScheduleIngestor {
            extractors: vec![
                Box::new(FlatTableExtractor),
                Box::new(MatrixExtractor::default()),
            ],
            preview_path: preview_path.into(),
        }
    }

    pub fn with_extractors(
        extractors: Vec<Box<dyn Extractor>>,
        preview_path: impl Into<PathBuf>,
    ) -> Self {
        ScheduleIngestor {
            extractors,
            preview_path: preview_path.into(),
        }
    }

    pub fn preview_path(&self) -> &Path {
        &self.preview_path
    }

    pub fn ingest(&self, grid: &dyn CellGrid) -> Vec<NormalizedRow> {
        for (position, extractor) in self.extractors.iter().enumerate() {
            let rows = extractor.extract(grid);
            if !rows.is_empty() {
                info!(layout = extractor.name(), rows = rows.len(), "schedule extracted");
                return rows;
            }
            if let Some(next) = self.extractors.get(position + 1) {
                warn!(
                    layout = extractor.name(),
                    fallback = next.name(),
                    "layout not recognized, trying next extractor"
                );
            }
        }

        warn!(
            preview = %self.preview_path.display(),
            "no extractor recognized the sheet, writing preview"
        );
        if let Err(err) = write_preview(grid, &self.preview_path) {
            warn!(preview = %self.preview_path.display(), "failed to write sheet preview: {err}");
        }
        Vec::new()
    }

    pub fn ingest_file(&self, path: &Path) -> Result<Vec<NormalizedRow>, IngestError> {
        let grid = load_grid(path)?;
        Ok(self.ingest(&grid))
    }
}

/// Raw cell text, tab-separated, newlines inside cells flattened to spaces.
pub fn render_preview(grid: &dyn CellGrid, max_rows: usize, max_cols: usize) -> String {
    let rows = grid.height().min(max_rows);
    let cols = grid.width().min(max_cols);
    let mut out = String::new();
    for row in 0..rows {
        let line: Vec<String> = (0..cols)
            .map(|col| grid.text(row, col).replace(['\r', '\n'], " "))
            .collect();
        out.push_str(&line.join("\t"));
        out.push('\n');
    }
    out
}

fn write_preview(grid: &dyn CellGrid, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_preview(grid, PREVIEW_MAX_ROWS, PREVIEW_MAX_COLS))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{render_preview, Extractor, ScheduleIngestor};
    use crate::schedule::day::Day;
    use crate::schedule::row::NormalizedRow;
    use crate::sheet::{CellGrid, SheetGrid};

    struct Fixed(&'static str, usize);

    impl Extractor for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract(&self, _grid: &dyn CellGrid) -> Vec<NormalizedRow> {
            (0..self.1)
                .filter_map(|i| {
                    NormalizedRow::new(self.0, Day::Mon, None, &format!("s{i}"), "", None)
                })
                .collect()
        }
    }

    #[test]
    fn first_non_empty_strategy_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ingestor = ScheduleIngestor::with_extractors(
            vec![Box::new(Fixed("a", 0)), Box::new(Fixed("b", 2)), Box::new(Fixed("c", 5))],
            dir.path().join("preview.txt"),
        );
        let rows = ingestor.ingest(&SheetGrid::default());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.group == "b"));
        assert!(!dir.path().join("preview.txt").exists());
    }

    #[test]
    fn preview_is_bounded_and_flattened() {
        let mut grid = SheetGrid::blank(80, 40);
        grid.set(0, 0, "line one\nline two");
        grid.set(0, 1, "x");
        grid.set(79, 39, "far away");

        let text = render_preview(&grid, 60, 30);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 60);
        assert_eq!(lines[0].split('\t').count(), 30);
        assert!(lines[0].starts_with("line one line two\tx\t"));
        assert!(!text.contains("far away"));
    }

    #[test]
    fn unrecognized_sheet_writes_preview_and_returns_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preview = dir.path().join("nested").join("preview.txt");
        let ingestor = ScheduleIngestor::new(preview.clone());
        let grid = SheetGrid::from_rows([vec!["hello", "world"], vec!["1", "2"]]);

        assert!(ingestor.ingest(&grid).is_empty());
        let dumped = fs::read_to_string(&preview).expect("preview should exist");
        assert_eq!(dumped, "hello\tworld\n1\t2\n");
    }

    #[test]
    fn unwritable_preview_does_not_fail_ingest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").expect("fixture");
        let ingestor = ScheduleIngestor::new(blocker.join("preview.txt"));
        assert!(ingestor.ingest(&SheetGrid::from_rows([vec!["?"]])).is_empty());
    }
}
