//! Cell-grid access for timetable workbooks.
//!
//! Extractors never touch calamine directly: they read through [CellGrid], which
//! answers every (row, column) lookup with text and treats anything outside the
//! sheet's extent as an empty cell. Coordinates are absolute and zero-based.

use std::collections::HashMap;

pub mod loader;

pub use loader::{load_grid, LoadError};

/// Rectangular merged region (inclusive bounds) with the value of its top-left cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRegion {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
    pub value: String,
}

/// Read access to one worksheet.
pub trait CellGrid {
    /// Number of rows in the used extent.
    fn height(&self) -> usize;

    /// Number of columns in the used extent.
    fn width(&self) -> usize;

    /// Raw cell text, `None` when the cell is outside the extent.
    fn cell(&self, row: usize, col: usize) -> Option<&str>;

    fn merged_regions(&self) -> &[MergedRegion];

    /// Cell text with overruns read as empty.
    fn text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).unwrap_or("")
    }
}

/// In-memory worksheet used by every loader and by tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetGrid {
    rows: Vec<Vec<String>>,
    width: usize,
    merged: Vec<MergedRegion>,
}

impl SheetGrid {
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        SheetGrid {
            rows,
            width,
            merged: Vec::new(),
        }
    }

    /// Empty grid of the given extent.
    pub fn blank(height: usize, width: usize) -> Self {
        SheetGrid {
            rows: vec![vec![String::new(); width]; height],
            width,
            merged: Vec::new(),
        }
    }

    /// Write one cell, growing the extent when needed.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.into();
        self.width = self.width.max(col + 1);
    }

    /// Register a merged region; its value is whatever the top-left cell holds now.
    pub fn merge(&mut self, first_row: usize, first_col: usize, last_row: usize, last_col: usize) {
        let value = self.text(first_row, first_col).to_string();
        self.merged.push(MergedRegion {
            first_row,
            first_col,
            last_row: last_row.max(first_row),
            last_col: last_col.max(first_col),
            value,
        });
    }

    pub fn with_merge(
        mut self,
        first_row: usize,
        first_col: usize,
        last_row: usize,
        last_col: usize,
    ) -> Self {
        self.merge(first_row, first_col, last_row, last_col);
        self
    }
}

impl CellGrid for SheetGrid {
    fn height(&self) -> usize {
        self.rows.len()
    }

    fn width(&self) -> usize {
        self.width
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if col >= self.width {
            return None;
        }
        let cells = self.rows.get(row)?;
        Some(cells.get(col).map(String::as_str).unwrap_or(""))
    }

    fn merged_regions(&self) -> &[MergedRegion] {
        &self.merged
    }
}

/// Cell lookup that reads the top-left value for any cell covered by a merged region.
pub struct MergedView<'a, G: CellGrid + ?Sized> {
    grid: &'a G,
    covered: HashMap<(usize, usize), &'a str>,
}

impl<'a, G: CellGrid + ?Sized> MergedView<'a, G> {
    pub fn new(grid: &'a G) -> Self {
        let mut covered = HashMap::new();
        for region in grid.merged_regions() {
            // Clamp to the sheet so a corrupt region cannot blow up the map.
            let last_row = region.last_row.min(grid.height().saturating_sub(1));
            let last_col = region.last_col.min(grid.width().saturating_sub(1));
            for row in region.first_row..=last_row {
                for col in region.first_col..=last_col {
                    covered.insert((row, col), region.value.as_str());
                }
            }
        }
        MergedView { grid, covered }
    }

    /// Trimmed cell text; merged coverage wins unless the region's value is blank.
    pub fn value(&self, row: usize, col: usize) -> &'a str {
        match self.covered.get(&(row, col)) {
            Some(&value) if !value.trim().is_empty() => value.trim(),
            _ => self.grid.text(row, col).trim(),
        }
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }
}
