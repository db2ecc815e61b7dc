//! Natural-language time expression parsing.
//!
//! [`parse_time`] turns a free-text temporal expression plus a duration into
//! an absolute `[start, end)` window in UTC, anchored at a caller-supplied
//! civil "now". Expressions are bilingual (German/English): `"heute 15:00"`,
//! `"übermorgen"`, `"in 5 Tagen"`, `"Montag 14:00"`, `"tomorrow 18:30"`,
//! `"25. November"`, `"2025-12-01 18:00"`.
//!
//! Resolution walks an explicit, ordered rule table — order is part of the
//! contract because keywords overlap as substrings ("übermorgen" must be
//! tested before "morgen"). If no rule claims the input, the general
//! [fallback parser](crate::fallback) gets a shot; if that also fails, the
//! result is [`TemporalError::UnparseableTime`]. This function never guesses
//! a default time window.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Serialize;

use crate::clock::civil_to_instant;
use crate::error::{Result, TemporalError};
use crate::fallback::{parse_natural_date, FallbackConfig};
use crate::locale::{contains_month_name, find_weekday, RelativeUnit, AFTER_NEXT_QUALIFIERS};

/// An absolute `[start, end)` time window.
///
/// Invariant: `end - start` equals the requested duration exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParsedWindow {
    /// Start instant, UTC.
    pub start: DateTime<Utc>,
    /// End instant, UTC.
    pub end: DateTime<Utc>,
}

/// Default start time when an expression names a day but no time of day.
const DEFAULT_HOUR: u32 = 15;

/// One entry of the resolution table.
///
/// `applies` decides whether the rule claims the (lowercased) input;
/// `resolve` produces the civil start. A rule that claims the input but
/// fails to resolve it yields [`TemporalError::UnparseableTime`] — later
/// rules are not consulted, which keeps the precedence contract strict.
struct ParseRule {
    name: &'static str,
    applies: fn(&str) -> bool,
    resolve: fn(&str, &DateTime<Tz>) -> Option<DateTime<Tz>>,
}

/// The resolution order. First match wins.
const RULES: [ParseRule; 5] = [
    ParseRule {
        name: "today",
        applies: |s| s.contains("heute") || s.contains("today"),
        resolve: |s, now| day_offset_with_time(s, now, 0),
    },
    ParseRule {
        // Checked before "tomorrow": "übermorgen" contains "morgen".
        name: "day-after-tomorrow",
        applies: |s| s.contains("übermorgen"),
        resolve: |s, now| day_offset_with_time(s, now, 2),
    },
    ParseRule {
        name: "tomorrow",
        applies: |s| s.contains("morgen") || s.contains("tomorrow"),
        resolve: |s, now| day_offset_with_time(s, now, 1),
    },
    ParseRule {
        name: "relative-offset",
        applies: |s| {
            let p = offset_patterns();
            p.in_n_units.is_match(s) || p.n_units_from_now.is_match(s)
        },
        resolve: resolve_relative_offset,
    },
    ParseRule {
        name: "weekday",
        applies: |s| find_weekday(s).is_some(),
        resolve: resolve_weekday,
    },
];

/// Parse a natural-language time expression into a UTC window.
///
/// # Arguments
///
/// * `raw` — the time expression, German or English
/// * `duration_hours` — window length; must be strictly positive
/// * `anchor` — civil "now" in the deployment timezone
///
/// # Errors
///
/// [`TemporalError::InvalidDuration`] for non-positive or non-finite
/// durations, [`TemporalError::UnparseableTime`] when neither the rule
/// table nor the fallback parser can resolve the expression.
pub fn parse_time(
    raw: &str,
    duration_hours: f64,
    anchor: DateTime<Tz>,
) -> Result<ParsedWindow> {
    if !duration_hours.is_finite() || duration_hours <= 0.0 {
        return Err(TemporalError::InvalidDuration(format!(
            "duration_hours must be positive, got {duration_hours}"
        )));
    }

    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return Err(TemporalError::UnparseableTime("empty expression".into()));
    }

    let start_civil = match RULES.iter().find(|rule| (rule.applies)(&lowered)) {
        Some(rule) => (rule.resolve)(&lowered, &anchor).ok_or_else(|| {
            TemporalError::UnparseableTime(format!("rule '{}' rejected: '{raw}'", rule.name))
        })?,
        None => parse_natural_date(&lowered, &anchor, &FallbackConfig::default())
            .ok_or_else(|| TemporalError::UnparseableTime(format!("'{raw}'")))?,
    };

    let start_civil = correct_year(start_civil, &lowered, &anchor);

    let start = start_civil.with_timezone(&Utc);
    let end = start + Duration::seconds((duration_hours * 3600.0).round() as i64);

    Ok(ParsedWindow { start, end })
}

// ── Rule handlers ───────────────────────────────────────────────────────────

struct OffsetPatterns {
    // "in 3 stunden", "in 5 tagen", "in 2 hours"
    in_n_units: Regex,
    // "3 hours from now", "5 tagen from now"
    n_units_from_now: Regex,
    // Trailing time of day: "15:00", "15"
    time_of_day: Regex,
}

fn offset_patterns() -> &'static OffsetPatterns {
    static PATTERNS: OnceLock<OffsetPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| OffsetPatterns {
        in_n_units: Regex::new(
            r"in (\d+) (stunden?|tagen?|minuten?|hours?|days?|minutes?)",
        )
        .unwrap(),
        n_units_from_now: Regex::new(
            r"(\d+) (stunden?|tagen?|minuten?|hours?|days?|minutes?) from now",
        )
        .unwrap(),
        time_of_day: Regex::new(r"(\d{1,2}):?(\d{2})?").unwrap(),
    })
}

/// Shared handler for "today" / "tomorrow" / "day after tomorrow": the
/// anchor's civil date plus `days`, at the trailing `HH[:MM]` if present,
/// otherwise at the 15:00 default.
fn day_offset_with_time(s: &str, now: &DateTime<Tz>, days: i64) -> Option<DateTime<Tz>> {
    let date = now.date_naive() + Duration::days(days);
    let time = extract_time_of_day(s).unwrap_or(NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0)?);
    Some(civil_to_instant(date.and_time(time), now.timezone()))
}

/// "in N Stunden/Tagen/Minuten" or "N units from now" — absolute offset
/// from the anchor instant, no time-of-day default involved.
fn resolve_relative_offset(s: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let p = offset_patterns();
    let caps = p.in_n_units.captures(s).or_else(|| p.n_units_from_now.captures(s))?;
    let amount: i64 = caps.get(1)?.as_str().parse().ok()?;
    let offset = match RelativeUnit::from_word(caps.get(2)?.as_str())? {
        RelativeUnit::Hours => Duration::hours(amount),
        RelativeUnit::Days => Duration::days(amount),
        RelativeUnit::Minutes => Duration::minutes(amount),
    };
    Some(*now + offset)
}

/// Named weekday, strictly in the future: if the anchor already is that
/// weekday, resolve to next week. An "übernächsten"/"after next" qualifier
/// adds another week.
fn resolve_weekday(s: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let target = find_weekday(s)?;
    let mut days_ahead = target.num_days_from_monday() as i64
        - now.weekday().num_days_from_monday() as i64;
    if days_ahead <= 0 {
        days_ahead += 7;
    }
    if AFTER_NEXT_QUALIFIERS.iter().any(|q| s.contains(q)) {
        days_ahead += 7;
    }

    let date = now.date_naive() + Duration::days(days_ahead);
    let time = extract_time_of_day(s).unwrap_or(NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0)?);
    Some(civil_to_instant(date.and_time(time), now.timezone()))
}

/// Extract a trailing `HH[:MM]` (or bare `HH`) time of day from the text.
fn extract_time_of_day(s: &str) -> Option<NaiveTime> {
    let caps = offset_patterns().time_of_day.captures(s)?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps
        .get(2)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

// ── Year correction ─────────────────────────────────────────────────────────

/// Deterministic year-rollover correction, applied after any rule resolved
/// a civil start.
///
/// - ISO-shaped input (`YYYY-MM-DD…`): lift the year to the anchor's year
///   only when the parsed year lies in the past. An explicitly typed future
///   year is never touched.
/// - Resolved instant not after the anchor, with a month name in the text:
///   same lift. The user named a calendar date, so a past year means the
///   rollover was missed.
/// - Resolved instant in the past without a month name: accepted unchanged.
///   Deliberately preserved behavior of the deployed system; see DESIGN.md.
fn correct_year(start: DateTime<Tz>, lowered: &str, anchor: &DateTime<Tz>) -> DateTime<Tz> {
    static ISO_SHAPE: OnceLock<Regex> = OnceLock::new();
    let iso = ISO_SHAPE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());

    let lift = |dt: DateTime<Tz>| -> DateTime<Tz> {
        if dt.year() < anchor.year() {
            let lifted = dt
                .naive_local()
                .with_year(anchor.year())
                .map(|naive| civil_to_instant(naive, dt.timezone()));
            if let Some(lifted) = lifted {
                tracing::info!(from = dt.year(), to = anchor.year(), "lifted parsed year");
                return lifted;
            }
        }
        dt
    };

    if iso.is_match(lowered) {
        lift(start)
    } else if start <= *anchor && contains_month_name(lowered) {
        lift(start)
    } else {
        start
    }
}
