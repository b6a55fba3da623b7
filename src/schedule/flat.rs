//! Flat-table layout: a header row naming the columns, then one lesson per row.

use std::collections::HashMap;

use tracing::debug;

use super::day::{normalize_day, ResolvedDay};
use super::ingest::Extractor;
use super::row::NormalizedRow;
use crate::sheet::CellGrid;

const GROUP_HEADERS: &[&str] = &["group", "guruh", "группа", "gruppa"];
const DAY_HEADERS: &[&str] = &["day", "kun", "день", "den"];
const TIME_HEADERS: &[&str] = &["time", "soat", "время", "vaqt"];
const SUBJECT_HEADERS: &[&str] = &["subject", "fan", "предмет"];
const TEACHER_HEADERS: &[&str] = &[
    "teacher",
    "o'qituvchi",
    "oqituvchi",
    "преподаватель",
    "teacher name",
];
const ROOM_HEADERS: &[&str] = &["room", "auditoriya", "аудитория"];

/// Column positions of the recognized fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub group: Option<usize>,
    pub day: Option<usize>,
    pub time: Option<usize>,
    pub subject: Option<usize>,
    pub teacher: Option<usize>,
    pub room: Option<usize>,
}

impl ColumnMap {
    /// Enough columns to attempt extraction at all.
    pub fn is_usable(&self) -> bool {
        self.group.is_some() || (self.day.is_some() && self.subject.is_some())
    }
}

/// Map header labels in row 0 to field columns. A repeated label keeps its last column.
pub fn resolve_columns(grid: &dyn CellGrid) -> ColumnMap {
    let mut index: HashMap<String, usize> = HashMap::new();
    for col in 0..grid.width() {
        let label = grid.text(0, col).trim().to_lowercase();
        if !label.is_empty() {
            index.insert(label, col);
        }
    }
    let find = |aliases: &[&str]| aliases.iter().find_map(|alias| index.get(*alias).copied());
    ColumnMap {
        group: find(GROUP_HEADERS),
        day: find(DAY_HEADERS),
        time: find(TIME_HEADERS),
        subject: find(SUBJECT_HEADERS),
        teacher: find(TEACHER_HEADERS),
        room: find(ROOM_HEADERS),
    }
}

pub fn extract_flat_table(grid: &dyn CellGrid) -> Vec<NormalizedRow> {
    if grid.height() == 0 {
        return Vec::new();
    }
    let columns = resolve_columns(grid);
    if !columns.is_usable() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut unparsed_days = 0usize;
    for row in 1..grid.height() {
        let value = |col: Option<usize>| col.map_or("", |col| grid.text(row, col).trim());

        let group = value(columns.group);
        let subject = value(columns.subject);
        let day = match normalize_day(value(columns.day)) {
            ResolvedDay::Known(day) => day,
            ResolvedDay::Unparsed(raw) => {
                if !raw.is_empty() && !group.is_empty() && !subject.is_empty() {
                    unparsed_days += 1;
                }
                continue;
            }
        };
        let time = Some(value(columns.time));
        let teacher = value(columns.teacher);
        let room = Some(value(columns.room));

        if let Some(lesson) = NormalizedRow::new(group, day, time, subject, teacher, room) {
            rows.push(lesson);
        }
    }

    if unparsed_days > 0 {
        debug!(unparsed_days, "flat table: dropped rows with unrecognized day names");
    }
    rows
}

/// One-row-per-lesson table with a recognized header.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTableExtractor;

impl Extractor for FlatTableExtractor {
    fn name(&self) -> &'static str {
        "flat-table"
    }

    fn extract(&self, grid: &dyn CellGrid) -> Vec<NormalizedRow> {
        extract_flat_table(grid)
    }
}
