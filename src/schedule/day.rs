//! Day-name resolution: many spellings (English, Uzbek, Karakalpak, Russian in
//! Latin and Cyrillic script) collapse onto six canonical day codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    /// Calendar order, Monday first.
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    pub fn code(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
        }
    }

    /// Days since Monday.
    pub fn offset(self) -> u32 {
        match self {
            Day::Mon => 0,
            Day::Tue => 1,
            Day::Wed => 2,
            Day::Thu => 3,
            Day::Fri => 4,
            Day::Sat => 5,
        }
    }

    /// Karakalpak name shown to students and teachers.
    pub fn local_name(self) -> &'static str {
        match self {
            Day::Mon => "Dúyshembi",
            Day::Tue => "Shiyshembi",
            Day::Wed => "Sárshembi",
            Day::Thu => "Piyshembi",
            Day::Fri => "Juma",
            Day::Sat => "Shembi",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_day(s).known().ok_or_else(|| format!("unknown day '{}'", s.trim()))
    }
}

/// Known spellings, lower-case. Order matters for [find_day_within].
const DAY_ALIASES: &[(&str, Day)] = &[
    ("mon", Day::Mon),
    ("monday", Day::Mon),
    ("dushanba", Day::Mon),
    ("du", Day::Mon),
    ("pon", Day::Mon),
    ("пон", Day::Mon),
    ("понедельник", Day::Mon),
    ("dúyshembi", Day::Mon),
    ("tue", Day::Tue),
    ("tuesday", Day::Tue),
    ("seshanba", Day::Tue),
    ("se", Day::Tue),
    ("vt", Day::Tue),
    ("вт", Day::Tue),
    ("вторник", Day::Tue),
    ("shiyshembi", Day::Tue),
    ("wed", Day::Wed),
    ("wednesday", Day::Wed),
    ("chorshanba", Day::Wed),
    ("cho", Day::Wed),
    ("sr", Day::Wed),
    ("ср", Day::Wed),
    ("среда", Day::Wed),
    ("sárshembi", Day::Wed),
    ("thu", Day::Thu),
    ("thursday", Day::Thu),
    ("payshanba", Day::Thu),
    ("pay", Day::Thu),
    ("чт", Day::Thu),
    ("четверг", Day::Thu),
    ("piyshembi", Day::Thu),
    ("fri", Day::Fri),
    ("friday", Day::Fri),
    ("juma", Day::Fri),
    ("ju", Day::Fri),
    ("пт", Day::Fri),
    ("пятница", Day::Fri),
    ("sat", Day::Sat),
    ("saturday", Day::Sat),
    ("shanba", Day::Sat),
    ("sha", Day::Sat),
    ("сб", Day::Sat),
    ("суббота", Day::Sat),
    ("shembi", Day::Sat),
];

/// Outcome of [normalize_day]: a canonical day, or the trimmed input when no alias matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDay {
    Known(Day),
    Unparsed(String),
}

impl ResolvedDay {
    pub fn known(&self) -> Option<Day> {
        match self {
            ResolvedDay::Known(day) => Some(*day),
            ResolvedDay::Unparsed(_) => None,
        }
    }
}

/// Exact alias lookup on the trimmed, lower-cased token.
pub fn normalize_day(token: &str) -> ResolvedDay {
    let trimmed = token.trim();
    let key = trimmed.to_lowercase();
    DAY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, day)| ResolvedDay::Known(*day))
        .unwrap_or_else(|| ResolvedDay::Unparsed(trimmed.to_string()))
}

/// First alias (in table order) occurring anywhere in the lower-cased text.
pub fn find_day_within(text: &str) -> Option<Day> {
    let haystack = text.to_lowercase();
    DAY_ALIASES
        .iter()
        .find(|(alias, _)| haystack.contains(alias))
        .map(|(_, day)| *day)
}
