use serde::{Deserialize, Serialize};

use super::day::Day;

/// One lesson for one group, as produced by either extractor.
///
/// `group` and `subject` are never empty for rows that leave extraction; an
/// empty `teacher` means the teacher is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub group: String,
    pub day: Day,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub subject: String,
    pub teacher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl NormalizedRow {
    /// Builds a row when the required fields are present, `None` otherwise.
    pub fn new(
        group: &str,
        day: Day,
        time: Option<&str>,
        subject: &str,
        teacher: &str,
        room: Option<&str>,
    ) -> Option<Self> {
        let group = group.trim();
        let subject = subject.trim();
        if group.is_empty() || subject.is_empty() {
            return None;
        }
        Some(NormalizedRow {
            group: group.to_string(),
            day,
            time: non_empty(time),
            subject: subject.to_string(),
            teacher: teacher.trim().to_string(),
            room: non_empty(room),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
