//! Matrix layout: a day/period grid with one column per group.
//!
//! Nothing in the sheet declares its structure. Group identifiers sit in a fixed
//! header row with display names below them; six fixed row blocks hold the days.
//! Inside a block every row is read as a subject row whose teacher sits in the
//! row below. Each group column is followed by a marker column carrying either a
//! room number or, when blank next to a blank neighbour, the sign of a lesson
//! shared with the next group.
//!
//! Extraction runs as a fixed sequence of stages per (row, group):
//! [read_lesson] (pairing, first lines, title guard, teacher acceptance),
//! [attribute] (room and sharing), then row emission with [GroupColumn::display].

use tracing::warn;

use super::day::{find_day_within, Day};
use super::ingest::Extractor;
use super::merge::period_label;
use super::row::NormalizedRow;
use super::teacher::{has_academic_title, strip_last_parenthetical};
use crate::sheet::{CellGrid, MergedView};

/// Placeholder printed in marker columns of the header rows.
pub const MARKER_TOKEN: &str = "s/s";

/// Row range (inclusive, zero-based) holding one day's periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBlock {
    pub day: Day,
    pub first_row: usize,
    pub last_row: usize,
}

/// Fixed geometry of the matrix sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixLayout {
    pub group_id_row: usize,
    pub group_name_row: usize,
    pub time_col: usize,
    pub blocks: Vec<DayBlock>,
}

impl Default for MatrixLayout {
    fn default() -> Self {
        let block = |day, first_row, last_row| DayBlock {
            day,
            first_row,
            last_row,
        };
        MatrixLayout {
            group_id_row: 6,
            group_name_row: 7,
            time_col: 1,
            blocks: vec![
                block(Day::Mon, 8, 15),
                block(Day::Tue, 16, 23),
                block(Day::Wed, 24, 31),
                block(Day::Thu, 32, 39),
                block(Day::Fri, 40, 47),
                block(Day::Sat, 48, 53),
            ],
        }
    }
}

/// A group's column with the name shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupColumn {
    pub id: String,
    pub col: usize,
    pub name: Option<String>,
}

impl GroupColumn {
    /// `"<id> (<name>)"` when the name row says something different from the id.
    pub fn display(&self) -> String {
        match self.name.as_deref() {
            Some(name) if name != self.id => format!("{} ({})", self.id, name),
            _ => self.id.clone(),
        }
    }
}

/// Subject and accepted teacher read from one subject/teacher cell pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCell {
    pub subject: String,
    pub teacher: String,
}

/// Which groups a lesson belongs to and where its room came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribution {
    Individual { room: Option<String> },
    /// Shared with the group at index `next` in the located group list.
    Shared { next: usize, room: Option<String> },
}

/// Identifier cells look like `101-A (IT)`: a hyphen and a parenthesis pair.
pub fn is_group_identifier(text: &str) -> bool {
    !text.is_empty()
        && text != MARKER_TOKEN
        && text.contains('(')
        && text.contains(')')
        && text.contains('-')
}

fn is_group_name(text: &str) -> bool {
    !text.is_empty() && text != MARKER_TOKEN && !text.chars().all(|ch| ch.is_ascii_digit())
}

/// Room markers are plain digit strings.
pub fn room_marker(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty() && text.chars().all(|ch| ch.is_ascii_digit())).then(|| text.to_string())
}

/// Group columns in sheet order. A repeated identifier keeps its first column.
pub fn locate_groups<G: CellGrid + ?Sized>(
    view: &MergedView<'_, G>,
    layout: &MatrixLayout,
) -> Vec<GroupColumn> {
    let mut groups: Vec<GroupColumn> = Vec::new();
    for col in 0..view.width() {
        let id = view.value(layout.group_id_row, col);
        if !is_group_identifier(id) || groups.iter().any(|group| group.id == id) {
            continue;
        }
        let name = view.value(layout.group_name_row, col);
        groups.push(GroupColumn {
            id: id.to_string(),
            col,
            name: is_group_name(name).then(|| name.to_string()),
        });
    }
    groups
}

/// Explicit time cell, else the period implied by the row's offset in its block.
pub fn row_time_label<G: CellGrid + ?Sized>(
    view: &MergedView<'_, G>,
    layout: &MatrixLayout,
    block: &DayBlock,
    row: usize,
) -> String {
    let explicit = view.value(row, layout.time_col);
    if !explicit.is_empty() {
        return explicit.to_string();
    }
    period_label((row - block.first_row) / 2 + 1)
}

fn first_line(cell: &str) -> Option<&str> {
    cell.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Teacher text is kept only when it carries an academic title after the
/// trailing parenthetical is removed.
pub fn accept_teacher(line: &str) -> String {
    let clean = strip_last_parenthetical(line);
    if has_academic_title(clean) {
        clean.to_string()
    } else {
        String::new()
    }
}

/// Subject at `row`, teacher at `row + 1`; both cells must be non-empty.
pub fn read_lesson<G: CellGrid + ?Sized>(
    view: &MergedView<'_, G>,
    row: usize,
    col: usize,
) -> Option<LessonCell> {
    let subject_cell = view.value(row, col);
    let teacher_cell = view.value(row + 1, col);
    if subject_cell.is_empty() || teacher_cell.is_empty() {
        return None;
    }
    let subject = first_line(subject_cell)?;
    if has_academic_title(subject) {
        // A teacher line shifted into the subject row.
        return None;
    }
    let teacher = first_line(teacher_cell).map(accept_teacher).unwrap_or_default();
    Some(LessonCell {
        subject: subject.to_string(),
        teacher,
    })
}

fn next_group(groups: &[GroupColumn], current: &GroupColumn) -> Option<usize> {
    groups.iter().position(|group| group.col > current.col)
}

/// Room lookup and two-group sharing via the marker column after `groups[index]`.
pub fn attribute<G: CellGrid + ?Sized>(
    view: &MergedView<'_, G>,
    groups: &[GroupColumn],
    index: usize,
    row: usize,
) -> Attribution {
    let Some(group) = groups.get(index) else {
        return Attribution::Individual { room: None };
    };
    let marker_col = group.col + 1;
    if marker_col >= view.width() {
        return Attribution::Individual { room: None };
    }
    let marker = view.value(row, marker_col);
    if !marker.is_empty() {
        return Attribution::Individual {
            room: room_marker(marker),
        };
    }
    match next_group(groups, group) {
        Some(next) if view.value(row, groups[next].col).is_empty() => Attribution::Shared {
            next,
            room: room_marker(view.value(row, groups[next].col + 1)),
        },
        _ => Attribution::Individual { room: None },
    }
}

/// Run the matrix heuristics over a sheet; empty when no group header is found.
pub fn extract_matrix(grid: &dyn CellGrid, layout: &MatrixLayout) -> Vec<NormalizedRow> {
    let view = MergedView::new(grid);
    let groups = locate_groups(&view, layout);
    if groups.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for block in &layout.blocks {
        check_block_label(&view, block);
        let last_row = block.last_row.min(view.height().saturating_sub(1));
        for row in block.first_row..=last_row {
            if row >= view.height() {
                break;
            }
            let time = row_time_label(&view, layout, block, row);
            for (index, group) in groups.iter().enumerate() {
                let Some(lesson) = read_lesson(&view, row, group.col) else {
                    continue;
                };
                let (room, shared_with) = match attribute(&view, &groups, index, row) {
                    Attribution::Individual { room } => (room, None),
                    Attribution::Shared { next, room } => (room, groups.get(next)),
                };
                for target in std::iter::once(group).chain(shared_with) {
                    let emitted = NormalizedRow::new(
                        &target.display(),
                        block.day,
                        Some(&time),
                        &lesson.subject,
                        &lesson.teacher,
                        room.as_deref(),
                    );
                    rows.extend(emitted);
                }
            }
        }
    }
    rows
}

/// Warn when the label cell of a block names another day; extraction still uses the block's day.
fn check_block_label<G: CellGrid + ?Sized>(view: &MergedView<'_, G>, block: &DayBlock) {
    let label = view.value(block.first_row, 0);
    if label.is_empty() {
        return;
    }
    if let Some(found) = find_day_within(label) {
        if found != block.day {
            warn!(
                row = block.first_row,
                label,
                expected = %block.day,
                found = %found,
                "matrix day block label disagrees with its position"
            );
        }
    }
}

/// Day/period grid with group columns.
#[derive(Debug, Clone, Default)]
pub struct MatrixExtractor {
    pub layout: MatrixLayout,
}

impl Extractor for MatrixExtractor {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn extract(&self, grid: &dyn CellGrid) -> Vec<NormalizedRow> {
        extract_matrix(grid, &self.layout)
    }
}
