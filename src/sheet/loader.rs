//! Workbook loading: `.xlsx`/`.xlsm` (with merged regions), `.xls`/`.xlsb`/`.ods`
//! (values only) and `.csv` flat tables, all materialized as a [SheetGrid].

use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook, open_workbook_auto, Data, Range, Reader, Xlsx};
use thiserror::Error;

use super::SheetGrid;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open xlsx workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported file type '{0}' (expected .xlsx, .xlsm, .xls, .xlsb, .ods or .csv)")]
    Unsupported(String),
    #[error("workbook has no sheets")]
    NoSheets,
}

/// Load the first worksheet of `path` into memory.
pub fn load_grid(path: &Path) -> Result<SheetGrid, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xlsm" => {
            let workbook: Xlsx<_> = open_workbook(path)?;
            load_xlsx(workbook)
        }
        "xls" | "xlsb" | "ods" => load_auto(path),
        "csv" => load_csv(path),
        other => Err(LoadError::Unsupported(other.to_string())),
    }
}

/// Load the first sheet from an already opened xlsx workbook, merged regions included.
pub fn load_xlsx<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<SheetGrid, LoadError> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoSheets)?;
    let range = workbook.worksheet_range(&sheet_name)?;
    let mut grid = grid_from_range(&range);

    workbook.load_merged_regions()?;
    let regions: Vec<((u32, u32), (u32, u32))> = workbook
        .merged_regions_by_sheet(&sheet_name)
        .into_iter()
        .map(|(_, _, dimensions)| (dimensions.start, dimensions.end))
        .collect();
    for ((first_row, first_col), (last_row, last_col)) in regions {
        grid.merge(
            first_row as usize,
            first_col as usize,
            last_row as usize,
            last_col as usize,
        );
    }
    Ok(grid)
}

fn load_auto(path: &Path) -> Result<SheetGrid, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoSheets)?;
    let range = workbook.worksheet_range(&sheet_name)?;
    Ok(grid_from_range(&range))
}

fn load_csv(path: &Path) -> Result<SheetGrid, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    Ok(SheetGrid::from_rows(rows))
}

/// Copy a calamine range into a grid, keeping sheet-absolute coordinates.
pub fn grid_from_range(range: &Range<Data>) -> SheetGrid {
    let Some((start_row, start_col)) = range.start() else {
        return SheetGrid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let mut grid = SheetGrid::blank(start_row + range.height(), start_col + range.width());
    for (row, col, value) in range.cells() {
        let text = cell_text(value);
        if !text.is_empty() {
            grid.set(start_row + row, start_col + col, text);
        }
    }
    grid
}

/// Display text for one cell; integral floats drop their fractional part.
pub fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
