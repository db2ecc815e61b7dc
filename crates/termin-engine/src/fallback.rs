//! Best-effort natural-language date parsing.
//!
//! This is the last resort of the expression parser and the workhorse of the
//! range preprocessor: given free text that none of the keyword rules
//! claimed, try to read it as a concrete calendar date, with or without a
//! time of day. Covered shapes:
//!
//! - ISO: `2025-12-01`, `2025-12-01 18:30`, `2025-12-01T18:30:00`
//! - German dotted: `25.11.`, `25.11.2025`, `3.3. 18:00`
//! - Day + month name: `25. November`, `3. März 2026`, `25 november 18 uhr`
//! - Month name + day (English order): `november 25`, `march 3rd, 2026`
//! - Bare time: `18:30` (today, or the next day under future preference)
//!
//! Failures return `None`, never an error — callers decide whether that is
//! fatal ([`crate::parser::parse_time`]) or recoverable
//! ([`crate::preprocess::preprocess`]).

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use regex::Regex;

use crate::clock::civil_to_instant;
use crate::locale::month_number;

/// Direction preference when the input does not carry an explicit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferDatesFrom {
    /// Resolve to the next occurrence (bump the year/day forward when the
    /// candidate lies at or before the anchor). Used by the expression parser.
    #[default]
    Future,
    /// Resolve within the current year/day; the caller disambiguates.
    /// Used by the range preprocessor, where the range bounds themselves
    /// determine direction.
    CurrentPeriod,
}

/// Component order for purely numeric dates (`01/12` vs `12/01`).
/// Dotted dates are always day-first; that is what the dot notation means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    #[default]
    Dmy,
    Mdy,
}

/// Settings for [`parse_natural_date`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackConfig {
    pub prefer: PreferDatesFrom,
    pub date_order: DateOrder,
}

struct DatePatterns {
    // 2025-12-01, 2025-12-01 18:30, 2025-12-01T18:30:00
    iso: Regex,
    // 25.11.2025 [18:30], 25.11. [18 uhr], 3.3.
    dotted: Regex,
    // 01/12[/2025], order per DateOrder
    slashed: Regex,
    // 25. November [2025] [18:30], 25 november [18 uhr]
    day_month: Regex,
    // november 25[th][, 2025] [18:30]
    month_day: Regex,
    // 18:30
    bare_time: Regex,
    // 18 uhr, um 18:30 uhr
    uhr_time: Regex,
}

fn patterns() -> &'static DatePatterns {
    static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DatePatterns {
        iso: Regex::new(
            r"^(\d{4})-(\d{2})-(\d{2})(?:[ t](\d{1,2}):(\d{2})(?::(\d{2}))?)?$",
        )
        .unwrap(),
        dotted: Regex::new(&format!(
            r"^(\d{{1,2}})\.\s?(\d{{1,2}})\.?\s?(\d{{4}})?{TIME_SUFFIX}$"
        ))
        .unwrap(),
        slashed: Regex::new(&format!(
            r"^(\d{{1,2}})/(\d{{1,2}})(?:/(\d{{4}}))?{TIME_SUFFIX}$"
        ))
        .unwrap(),
        day_month: Regex::new(&format!(
            r"^(\d{{1,2}})\.?\s*(?:of\s+)?(\p{{L}}+)\.?(?:\s+(\d{{4}}))?{TIME_SUFFIX}$"
        ))
        .unwrap(),
        month_day: Regex::new(&format!(
            r"^(\p{{L}}+)\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?{TIME_SUFFIX}$"
        ))
        .unwrap(),
        bare_time: Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap(),
        uhr_time: Regex::new(r"^(?:um\s+)?(\d{1,2})(?::(\d{2}))?\s*uhr$").unwrap(),
    })
}

/// Optional trailing time of day: " 18:30", " um 18 uhr", " 18 uhr".
/// Two capture groups (hour, minute).
const TIME_SUFFIX: &str = r"(?:\s+(?:um\s+)?(\d{1,2})(?::(\d{2}))?(?:\s*uhr)?)?";

/// What the matched text pinned down, for the future-preference bump.
enum Precision {
    /// Year given explicitly — never adjusted.
    ExplicitYear,
    /// Date without year — bump by one year when at/before the anchor.
    YearOpen,
    /// Time only — bump by one day when at/before the anchor.
    DateOpen,
}

/// Parse free text as a calendar date (with optional time) in the anchor's
/// timezone. Missing time components default to midnight; a missing year
/// defaults to the anchor's year before preference handling.
pub fn parse_natural_date(
    text: &str,
    anchor: &DateTime<Tz>,
    config: &FallbackConfig,
) -> Option<DateTime<Tz>> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    let tz: Tz = anchor.timezone();
    let p = patterns();

    let (date, time, precision) = if let Some(c) = p.iso.captures(&text) {
        let date = NaiveDate::from_ymd_opt(
            num(&c, 1)?,
            num(&c, 2)?,
            num(&c, 3)?,
        )?;
        let time = match c.get(4) {
            Some(_) => NaiveTime::from_hms_opt(num(&c, 4)?, num(&c, 5)?, num_or(&c, 6, 0)?)?,
            None => NaiveTime::MIN,
        };
        (date, time, Precision::ExplicitYear)
    } else if let Some(c) = p.dotted.captures(&text) {
        let (day, month) = (num(&c, 1)?, num(&c, 2)?);
        build_dmy(day, month, opt_num(&c, 3), &c, 4, anchor)?
    } else if let Some(c) = p.slashed.captures(&text) {
        let (a, b): (u32, u32) = (num(&c, 1)?, num(&c, 2)?);
        let (day, month) = match config.date_order {
            DateOrder::Dmy => (a, b),
            DateOrder::Mdy => (b, a),
        };
        build_dmy(day, month, opt_num(&c, 3), &c, 4, anchor)?
    } else if let Some(c) = p.bare_time.captures(&text) {
        let time = NaiveTime::from_hms_opt(num(&c, 1)?, num(&c, 2)?, 0)?;
        (anchor.date_naive(), time, Precision::DateOpen)
    } else if let Some(c) = p.uhr_time.captures(&text) {
        let time = NaiveTime::from_hms_opt(num(&c, 1)?, opt_num(&c, 2).unwrap_or(0), 0)?;
        (anchor.date_naive(), time, Precision::DateOpen)
    } else if let Some(c) = p.day_month.captures(&text) {
        let month = month_number(c.get(2)?.as_str())?;
        build_dmy(num(&c, 1)?, month, opt_num(&c, 3), &c, 4, anchor)?
    } else if let Some(c) = p.month_day.captures(&text) {
        let month = month_number(c.get(1)?.as_str())?;
        build_dmy(num(&c, 2)?, month, opt_num(&c, 3), &c, 4, anchor)?
    } else {
        return None;
    };

    let mut resolved = civil_to_instant(date.and_time(time), tz);

    if matches!(config.prefer, PreferDatesFrom::Future) && resolved <= *anchor {
        resolved = match precision {
            Precision::ExplicitYear => resolved,
            Precision::YearOpen => {
                let next = date.with_year(date.year() + 1)?;
                civil_to_instant(next.and_time(time), tz)
            }
            Precision::DateOpen => {
                let next = date.succ_opt()?;
                civil_to_instant(next.and_time(time), tz)
            }
        };
    }

    Some(resolved)
}

/// Assemble a day/month[/year] capture plus optional trailing time.
fn build_dmy(
    day: u32,
    month: u32,
    year: Option<i32>,
    caps: &regex::Captures<'_>,
    time_group: usize,
    anchor: &DateTime<Tz>,
) -> Option<(NaiveDate, NaiveTime, Precision)> {
    let precision = match year {
        Some(_) => Precision::ExplicitYear,
        None => Precision::YearOpen,
    };
    let date = NaiveDate::from_ymd_opt(year.unwrap_or(anchor.year()), month, day)?;
    let time = match caps.get(time_group) {
        Some(h) => NaiveTime::from_hms_opt(
            h.as_str().parse().ok()?,
            caps.get(time_group + 1)
                .map(|m| m.as_str().parse().ok())
                .unwrap_or(Some(0))?,
            0,
        )?,
        None => NaiveTime::MIN,
    };
    Some((date, time, precision))
}

fn num<T: std::str::FromStr>(caps: &regex::Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn num_or(caps: &regex::Captures<'_>, group: usize, default: u32) -> Option<u32> {
    match caps.get(group) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(default),
    }
}

fn opt_num<T: std::str::FromStr>(caps: &regex::Captures<'_>, group: usize) -> Option<T> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::default_timezone;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Tz> {
        // Friday, 2025-11-28 10:00 Berlin time.
        default_timezone()
            .with_ymd_and_hms(2025, 11, 28, 10, 0, 0)
            .unwrap()
    }

    fn cfg_future() -> FallbackConfig {
        FallbackConfig::default()
    }

    fn cfg_current() -> FallbackConfig {
        FallbackConfig {
            prefer: PreferDatesFrom::CurrentPeriod,
            ..Default::default()
        }
    }

    #[test]
    fn iso_date_midnight() {
        let dt = parse_natural_date("2025-12-01", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(dt.time(), NaiveTime::MIN);
    }

    #[test]
    fn iso_datetime_with_time() {
        let dt = parse_natural_date("2025-12-01 18:30", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.hour(), 18);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn iso_past_year_is_not_bumped() {
        // Explicit years are left alone here; the parser's year correction
        // owns that decision.
        let dt = parse_natural_date("2024-11-01", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.year(), 2024);
    }

    #[test]
    fn dotted_with_year() {
        let dt = parse_natural_date("25.11.2025", &anchor(), &cfg_current()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 25).unwrap());
    }

    #[test]
    fn dotted_without_year_future_preference() {
        // 25.11. already passed at the anchor (28.11.) — future preference
        // rolls into next year.
        let dt = parse_natural_date("25.11.", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2026, 11, 25).unwrap());
    }

    #[test]
    fn dotted_without_year_current_period() {
        let dt = parse_natural_date("25.11.", &anchor(), &cfg_current()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 25).unwrap());
    }

    #[test]
    fn german_day_month_name() {
        let dt = parse_natural_date("3. märz", &anchor(), &cfg_current()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    }

    #[test]
    fn german_day_month_with_time() {
        let dt = parse_natural_date("25. november 18:00", &anchor(), &cfg_current()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 25).unwrap());
        assert_eq!(dt.hour(), 18);
    }

    #[test]
    fn german_uhr_time() {
        let dt = parse_natural_date("1. dezember um 19 uhr", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(dt.hour(), 19);
    }

    #[test]
    fn english_month_day() {
        let dt = parse_natural_date("december 24", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 24).unwrap());
    }

    #[test]
    fn english_month_day_ordinal_with_year() {
        let dt = parse_natural_date("march 3rd, 2026", &anchor(), &cfg_current()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    }

    #[test]
    fn bare_time_future_rolls_to_next_day() {
        // 09:00 is before the 10:00 anchor, so "next occurrence" is tomorrow.
        let dt = parse_natural_date("09:00", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 29).unwrap());
        assert_eq!(dt.hour(), 9);
    }

    #[test]
    fn bare_time_later_today_stays_today() {
        let dt = parse_natural_date("18:00", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 28).unwrap());
    }

    #[test]
    fn bare_uhr_time() {
        let dt = parse_natural_date("18 Uhr", &anchor(), &cfg_future()).unwrap();
        assert_eq!(dt.hour(), 18);
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 28).unwrap());
    }

    #[test]
    fn unparseable_returns_none() {
        assert!(parse_natural_date("nicht existierender ausdruck", &anchor(), &cfg_future()).is_none());
        assert!(parse_natural_date("", &anchor(), &cfg_future()).is_none());
    }

    #[test]
    fn invalid_calendar_date_returns_none() {
        assert!(parse_natural_date("32.13.2025", &anchor(), &cfg_future()).is_none());
    }
}
