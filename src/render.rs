//! Plain-text listings in the wording students and teachers see.

use chrono::{Datelike, Duration, NaiveDate};

use crate::schedule::{Day, ScheduleSnapshot};

const GROUP_INDENT: &str = "              ";

/// Date of `day` in the Monday-based week containing `reference`.
pub fn date_in_week(reference: NaiveDate, day: Day) -> NaiveDate {
    let monday = reference - Duration::days(i64::from(reference.weekday().num_days_from_monday()));
    monday + Duration::days(i64::from(day.offset()))
}

pub fn render_group_day(snapshot: &ScheduleSnapshot, group: &str, day: Day) -> String {
    let rows: Vec<_> = snapshot
        .group_day(group, day)
        .iter()
        .filter(|row| !row.subject.trim().is_empty())
        .collect();
    if rows.is_empty() {
        return format!("{group} gruppasında {day} kúni sabaq joq.");
    }

    let mut lines = vec![format!("{group} — {} ({day})", day.local_name()), String::new()];
    for (number, row) in rows.iter().enumerate() {
        lines.push(format!("{}. Pán: {}", number + 1, row.subject));
        if !row.teacher.is_empty() {
            lines.push(format!("   Muǵallim: {}", row.teacher));
        }
        if let Some(room) = &row.room {
            lines.push(format!("   [{room}-auditoriya]"));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn render_teacher_week(snapshot: &ScheduleSnapshot, teacher: &str, reference: NaiveDate) -> String {
    let week = snapshot.teacher_week(teacher);
    if week.is_empty() {
        return format!("{teacher} ushın sabaqlar tabılmadı.");
    }

    let mut lines = vec![format!("Muǵallim: {teacher}"), String::new()];
    for (day, entries) in week {
        let date = date_in_week(reference, day).format("%d.%m.%Y");
        lines.push(format!("{} ({date}):", day.local_name()));
        for (position, entry) in entries.iter().enumerate() {
            lines.push(format!("{}-para. {}", entry.period_label(position + 1), entry.subject));
            for group in &entry.groups {
                lines.push(format!("{GROUP_INDENT}{group}"));
            }
            if let Some(room) = &entry.room {
                lines.push(format!("{GROUP_INDENT}[{room} - auditoriya]"));
            }
            lines.push(String::new());
        }
    }
    lines.join("\n")
}
