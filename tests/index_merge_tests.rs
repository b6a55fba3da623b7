use timetable::schedule::{merge_lessons, Day, NormalizedRow, ScheduleSnapshot};

fn row(group: &str, day: Day, time: &str, subject: &str, teacher: &str, room: &str) -> NormalizedRow {
    NormalizedRow::new(group, day, Some(time), subject, teacher, Some(room)).expect("fixture row")
}

fn sample_rows() -> Vec<NormalizedRow> {
    vec![
        row("G2", Day::Mon, "I", "Algebra", "Dr. Karimov (KT)", "305"),
        row("G1", Day::Mon, "I", "Physics", "Prof. Aliev", "210"),
        row("G2", Day::Mon, "II", "Physics", "Prof.  Aliev", "210"),
        row("G1", Day::Tue, "I", "History", "", "12"),
        row("G3", Day::Mon, "III", "Algebra", "Dr. Karimov", "305"),
        row("G1", Day::Mon, "II", "Drawing", "Dr. Karimov (IT)", ""),
    ]
}

#[test]
fn partitions_recover_every_row_in_source_order() {
    let rows = sample_rows();
    let snapshot = ScheduleSnapshot::build(rows.clone());

    assert_eq!(snapshot.groups(), ["G1", "G2", "G3"]);
    assert_eq!(snapshot.teachers(), ["Dr. Karimov", "Prof. Aliev"]);

    let mut recovered = 0;
    for group in snapshot.groups() {
        for day in Day::ALL {
            let partition = snapshot.group_day(group, day);
            recovered += partition.len();
            let positions: Vec<usize> = partition
                .iter()
                .map(|found| {
                    snapshot
                        .rows()
                        .iter()
                        .position(|candidate| candidate == found)
                        .expect("partition row comes from the input")
                })
                .collect();
            assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
    assert_eq!(recovered, rows.len());

    let karimov: Vec<&str> = snapshot
        .teacher("Dr. Karimov")
        .iter()
        .map(|r| r.subject.as_str())
        .collect();
    assert_eq!(karimov, vec!["Algebra", "Algebra", "Drawing"]);
    let with_teacher = snapshot.teacher("Dr. Karimov").len() + snapshot.teacher("Prof. Aliev").len();
    assert_eq!(with_teacher, rows.len() - 1);
}

#[test]
fn three_groups_in_one_lesson_merge_into_one_entry() {
    let rows = vec![
        row("G1", Day::Thu, "III", "Philosophy", "Prof. B", "401"),
        row("G2", Day::Thu, "III", "Philosophy", "Prof. B", "401"),
        row("G3", Day::Thu, "3", "Philosophy", "Prof. B", "401"),
        row("G1", Day::Thu, "III", "Logic", "Prof. B", "401"),
    ];
    let merged = merge_lessons(&rows);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].groups, vec!["G1", "G2", "G3"]);
    assert_eq!(merged[0].period, Some(3));
    assert_eq!(merged[1].subject, "Logic");
    assert_eq!(merged[1].groups, vec!["G1"]);
}

#[test]
fn merge_only_joins_adjacent_rows() {
    let rows = vec![
        row("G1", Day::Thu, "I", "Philosophy", "Prof. B", "401"),
        row("G1", Day::Thu, "II", "Logic", "Prof. B", "401"),
        row("G2", Day::Thu, "I", "Philosophy", "Prof. B", "401"),
    ];
    assert_eq!(merge_lessons(&rows).len(), 3);
}

#[test]
fn teacher_week_groups_by_day_in_calendar_order() {
    let snapshot = ScheduleSnapshot::build(sample_rows());
    let week = snapshot.teacher_week("Dr. Karimov (anything)");
    assert_eq!(week.len(), 1);
    let (day, entries) = &week[0];
    assert_eq!(*day, Day::Mon);
    let subjects: Vec<&str> = entries.iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Algebra", "Algebra", "Drawing"]);
}
