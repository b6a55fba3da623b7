//! Teacher-name cleanup shared by the matrix extractor and the index.

/// Title prefixes (lower-case) that mark a cell as holding a teacher name.
pub const ACADEMIC_TITLES: &[&str] = &[
    "ass.",
    "prof.",
    "phd.",
    "dr.",
    "doc.",
    "assistant",
    "professor",
];

/// True when `text` starts with a known academic title, ignoring case.
pub fn has_academic_title(text: &str) -> bool {
    let lower = text.trim_start().to_lowercase();
    ACADEMIC_TITLES.iter().any(|title| lower.starts_with(title))
}

/// Drop the last `(...)` group when it closes the string, e.g. `Dr. Ivanov (KT)`.
pub fn strip_last_parenthetical(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_suffix(')') else {
        return trimmed;
    };
    match inner.rfind('(') {
        Some(open) if !inner[open + 1..].contains(')') => inner[..open].trim(),
        _ => trimmed,
    }
}

/// Canonical teacher key: everything from the first `(` of a closing
/// parenthetical tail is removed, then whitespace runs collapse to one space.
pub fn normalize_teacher_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_tail = match (trimmed.ends_with(')'), trimmed.find('(')) {
        (true, Some(open)) => &trimmed[..open],
        _ => trimmed,
    };
    without_tail.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{has_academic_title, normalize_teacher_name, strip_last_parenthetical};

    #[test]
    fn titles_match_case_insensitively() {
        assert!(has_academic_title("Prof. Saidov"));
        assert!(has_academic_title("DR. Karimova"));
        assert!(has_academic_title("assistant Aliev"));
        assert!(!has_academic_title("Matematika"));
        assert!(!has_academic_title(""));
    }

    #[test]
    fn only_the_closing_group_is_stripped() {
        assert_eq!(strip_last_parenthetical("Dr. Ivanov (KT)"), "Dr. Ivanov");
        assert_eq!(strip_last_parenthetical("Dr. Ivanov (a) (b)"), "Dr. Ivanov (a)");
        assert_eq!(strip_last_parenthetical("Dr. Ivanov (KT) room"), "Dr. Ivanov (KT) room");
        assert_eq!(strip_last_parenthetical("odd) text)"), "odd) text)");
    }

    #[test]
    fn normalized_names_share_one_key() {
        assert_eq!(normalize_teacher_name("Dr.  A.   Karimov (IT-2)"), "Dr. A. Karimov");
        assert_eq!(normalize_teacher_name(" Dr. A. Karimov "), "Dr. A. Karimov");
        assert_eq!(normalize_teacher_name("Dr. A (x) (y)"), "Dr. A");
        assert_eq!(normalize_teacher_name(""), "");
    }

    #[test]
    fn inner_parenthesis_without_closing_tail_is_kept() {
        assert_eq!(normalize_teacher_name("Dr. (acting) Bekov"), "Dr. (acting) Bekov");
    }
}
