//! Bilingual (German/English) keyword tables.
//!
//! Every keyword the parser, preprocessor, and day-grouper recognize lives
//! here, so the full vocabulary of the engine is visible in one place.
//! Matching is case-insensitive substring matching over the lowercased
//! input, which is what users of a chat assistant actually produce
//! ("treffen am Montag um 14 Uhr").

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Output language for localized labels (weekday names in day buckets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    /// German — the deployment default.
    #[default]
    De,
    /// English.
    En,
}

/// Weekday keywords in match priority order (German first, as in the
/// deployment's primary language). Each entry is `(keyword, weekday)`.
pub const WEEKDAYS: [(&str, Weekday); 14] = [
    ("montag", Weekday::Mon),
    ("monday", Weekday::Mon),
    ("dienstag", Weekday::Tue),
    ("tuesday", Weekday::Tue),
    ("mittwoch", Weekday::Wed),
    ("wednesday", Weekday::Wed),
    ("donnerstag", Weekday::Thu),
    ("thursday", Weekday::Thu),
    ("freitag", Weekday::Fri),
    ("friday", Weekday::Fri),
    ("samstag", Weekday::Sat),
    ("saturday", Weekday::Sat),
    ("sonntag", Weekday::Sun),
    ("sunday", Weekday::Sun),
];

/// Month names, `(keyword, month number)`. German and English; the shared
/// spellings (april, august, september, november) appear once.
pub const MONTHS: [(&str, u32); 20] = [
    ("januar", 1),
    ("january", 1),
    ("februar", 2),
    ("february", 2),
    ("märz", 3),
    ("march", 3),
    ("april", 4),
    ("mai", 5),
    ("may", 5),
    ("juni", 6),
    ("june", 6),
    ("juli", 7),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("oktober", 10),
    ("october", 10),
    ("november", 11),
    ("dezember", 12),
    ("december", 12),
];

/// Returns the weekday for the first weekday keyword contained in `text`.
///
/// `text` must already be lowercased. Substring containment mirrors how the
/// rest of the engine matches keywords, so "am Montag um 14:00" works
/// without tokenization.
pub fn find_weekday(text: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| text.contains(name))
        .map(|&(_, wd)| wd)
}

/// True if `text` (lowercased) contains any German or English month name.
///
/// Used by the year-rollover correction: a month name signals the user named
/// a specific calendar date rather than a purely relative expression.
pub fn contains_month_name(text: &str) -> bool {
    MONTHS.iter().any(|(name, _)| text.contains(name))
}

/// Look up a month number by its (lowercased) name.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, m)| m)
}

/// Localized weekday label for day buckets.
pub fn weekday_label(weekday: Weekday, lang: Language) -> &'static str {
    match (weekday, lang) {
        (Weekday::Mon, Language::De) => "Montag",
        (Weekday::Tue, Language::De) => "Dienstag",
        (Weekday::Wed, Language::De) => "Mittwoch",
        (Weekday::Thu, Language::De) => "Donnerstag",
        (Weekday::Fri, Language::De) => "Freitag",
        (Weekday::Sat, Language::De) => "Samstag",
        (Weekday::Sun, Language::De) => "Sonntag",
        (Weekday::Mon, Language::En) => "Monday",
        (Weekday::Tue, Language::En) => "Tuesday",
        (Weekday::Wed, Language::En) => "Wednesday",
        (Weekday::Thu, Language::En) => "Thursday",
        (Weekday::Fri, Language::En) => "Friday",
        (Weekday::Sat, Language::En) => "Saturday",
        (Weekday::Sun, Language::En) => "Sunday",
    }
}

/// Relative-offset units with their bilingual stems.
///
/// Stems cover inflections on both sides: "Stunde"/"Stunden" and
/// "hour"/"hours" both start with their stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Hours,
    Days,
    Minutes,
}

impl RelativeUnit {
    /// Classify a unit word by its stem.
    pub fn from_word(word: &str) -> Option<Self> {
        if word.starts_with("stunde") || word.starts_with("hour") {
            Some(Self::Hours)
        } else if word.starts_with("tag") || word.starts_with("day") {
            Some(Self::Days)
        } else if word.starts_with("minute") {
            // "Minute"/"Minuten" and "minute"/"minutes" share the stem.
            Some(Self::Minutes)
        } else {
            None
        }
    }
}

/// Qualifiers meaning "the week after next" for weekday expressions.
pub const AFTER_NEXT_QUALIFIERS: [&str; 3] = ["übernächste", "übernächsten", "after next"];
