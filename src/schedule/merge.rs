//! Period labels and the teacher-view lesson merge.
//!
//! A lesson taught to several groups at once appears once per group in the
//! index. For a teacher's listing those copies are folded back into one entry
//! when they are adjacent and agree on subject, room and period number.

use serde::Serialize;

use super::row::NormalizedRow;

const ROMAN_PERIODS: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

/// Roman-numeral label for periods 1..=10, the plain number otherwise.
pub fn period_label(period: usize) -> String {
    match period.checked_sub(1).and_then(|idx| ROMAN_PERIODS.get(idx)) {
        Some(label) => (*label).to_string(),
        None => period.to_string(),
    }
}

/// Period number from a time label: `I`..`X`, else a leading run of digits.
pub fn parse_period_number(label: Option<&str>) -> Option<u32> {
    let value = label?.trim().to_uppercase();
    if value.is_empty() {
        return None;
    }
    if let Some(idx) = ROMAN_PERIODS.iter().position(|roman| *roman == value) {
        return u32::try_from(idx + 1).ok();
    }
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// One teacher-view entry: a lesson with every group attending it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedLessonEntry {
    /// Time label of the first row folded into this entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub period: Option<u32>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub groups: Vec<String>,
}

impl MergedLessonEntry {
    /// Period number, or the 1-based `position` of the entry within its day when unknown.
    pub fn period_label(&self, position: usize) -> String {
        match self.period {
            Some(period) => period.to_string(),
            None => position.to_string(),
        }
    }

    fn same_lesson(&self, subject: &str, room: Option<&str>, period: Option<u32>) -> bool {
        self.subject == subject
            && self.room.as_deref().unwrap_or("") == room.unwrap_or("")
            && self.period == period
    }
}

/// Fold consecutive rows of one teacher's day into merged entries.
///
/// Rows with a blank subject are skipped. Group names within an entry keep
/// first-seen order without duplicates.
pub fn merge_lessons<'a, I>(rows: I) -> Vec<MergedLessonEntry>
where
    I: IntoIterator<Item = &'a NormalizedRow>,
{
    let mut merged: Vec<MergedLessonEntry> = Vec::new();
    for row in rows {
        let subject = row.subject.trim();
        if subject.is_empty() {
            continue;
        }
        let room = row.room.as_deref().filter(|room| !room.is_empty());
        let period = parse_period_number(row.time.as_deref());

        match merged.last_mut() {
            Some(current) if current.same_lesson(subject, room, period) => {
                if !row.group.is_empty() && !current.groups.contains(&row.group) {
                    current.groups.push(row.group.clone());
                }
            }
            _ => merged.push(MergedLessonEntry {
                time: row.time.clone(),
                period,
                subject: subject.to_string(),
                room: room.map(str::to_string),
                groups: if row.group.is_empty() {
                    Vec::new()
                } else {
                    vec![row.group.clone()]
                },
            }),
        }
    }
    merged
}
