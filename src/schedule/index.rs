use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::day::Day;
use super::merge::{merge_lessons, MergedLessonEntry};
use super::row::NormalizedRow;
use super::teacher::normalize_teacher_name;

/// Summary counts of one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleStats {
    pub groups: usize,
    pub teachers: usize,
    pub lessons: usize,
}

/// Query views over one ingest pass. Never mutated after [ScheduleSnapshot::build].
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    rows: Vec<NormalizedRow>,
    groups: Vec<String>,
    teachers: Vec<String>,
    by_group_day: HashMap<(String, Day), Vec<NormalizedRow>>,
    by_teacher: HashMap<String, Vec<NormalizedRow>>,
}

impl ScheduleSnapshot {
    /// Normalize teacher names, then index. Row order within every partition is source order.
    pub fn build(rows: Vec<NormalizedRow>) -> Self {
        let rows: Vec<NormalizedRow> = rows
            .into_iter()
            .map(|mut row| {
                row.teacher = normalize_teacher_name(&row.teacher);
                row
            })
            .collect();

        let mut groups = BTreeSet::new();
        let mut teachers = BTreeSet::new();
        let mut by_group_day: HashMap<(String, Day), Vec<NormalizedRow>> = HashMap::new();
        let mut by_teacher: HashMap<String, Vec<NormalizedRow>> = HashMap::new();

        for row in &rows {
            groups.insert(row.group.clone());
            by_group_day
                .entry((row.group.clone(), row.day))
                .or_default()
                .push(row.clone());
            if !row.teacher.is_empty() {
                teachers.insert(row.teacher.clone());
                by_teacher
                    .entry(row.teacher.clone())
                    .or_default()
                    .push(row.clone());
            }
        }

        ScheduleSnapshot {
            rows,
            groups: groups.into_iter().collect(),
            teachers: teachers.into_iter().collect(),
            by_group_day,
            by_teacher,
        }
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn teachers(&self) -> &[String] {
        &self.teachers
    }

    /// All rows in ingest order, teacher names already normalized.
    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn group_day(&self, group: &str, day: Day) -> &[NormalizedRow] {
        self.by_group_day
            .get(&(group.to_string(), day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rows for a teacher; the name is normalized before lookup.
    pub fn teacher(&self, name: &str) -> &[NormalizedRow] {
        self.by_teacher
            .get(&normalize_teacher_name(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// A teacher's week as merged entries, days in calendar order, empty days skipped.
    pub fn teacher_week(&self, name: &str) -> Vec<(Day, Vec<MergedLessonEntry>)> {
        let rows = self.teacher(name);
        Day::ALL
            .iter()
            .filter_map(|day| {
                let merged = merge_lessons(rows.iter().filter(|row| row.day == *day));
                (!merged.is_empty()).then_some((*day, merged))
            })
            .collect()
    }

    pub fn stats(&self) -> ScheduleStats {
        ScheduleStats {
            groups: self.groups.len(),
            teachers: self.teachers.len(),
            lessons: self.rows.len(),
        }
    }
}
