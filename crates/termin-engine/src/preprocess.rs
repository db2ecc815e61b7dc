//! Range preprocessing of raw user text before intent routing.
//!
//! Users phrase range queries as "vom 28. November bis zum 3. März" or
//! "Events im Dezember". The downstream LLM router is much more reliable
//! given canonical absolute dates, so this pass rewrites:
//!
//! - two-sided ranges into `von YYYY-MM-DD bis YYYY-MM-DD`
//! - month-name queries into `in den nächsten <N> Tagen`
//!
//! and leaves everything else untouched. This is a pure best-effort
//! rewrite: any internal parse failure degrades to returning the input
//! unchanged (with a warning), never an error. At most one substitution is
//! made per call, and the canonical output never re-matches — feeding a
//! rewritten string back through is a no-op.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use regex::Regex;

use crate::clock::civil_to_instant;
use crate::fallback::{parse_natural_date, FallbackConfig, PreferDatesFrom};
use crate::locale::month_number;

/// Two-sided range patterns in fixed priority order. All match "vom"/"from"
/// prefixes only, so the canonical "von … bis …" output never re-matches.
fn range_patterns() -> &'static [Regex; 6] {
    static PATTERNS: OnceLock<[Regex; 6]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // vom 28. November 2025 bis zum 3. März 2026
            Regex::new(r"(?i)vom\s+([\d\.]+\s+\w+(?:\s+\d{4})?)\s+bis\s+zum\s+([\d\.]+\s+\w+(?:\s+\d{4})?)").unwrap(),
            // vom 28. November bis 3. März
            Regex::new(r"(?i)vom\s+([\d\.]+\s+\w+(?:\s+\d{4})?)\s+bis\s+([\d\.]+\s+\w+(?:\s+\d{4})?)").unwrap(),
            // vom 28.11. bis zum 3.3.
            Regex::new(r"(?i)vom\s+([\d\.]+\.?\s*\w+\.?)\s+bis\s+zum\s+([\d\.]+\.?\s*\w+\.?)").unwrap(),
            // vom 28.11. bis 3.3.
            Regex::new(r"(?i)vom\s+([\d\.]+\.?\s*\w+\.?)\s+bis\s+([\d\.]+\.?\s*\w+\.?)").unwrap(),
            // from November 28[, 2025] to March 3[, 2026]
            Regex::new(r"(?i)from\s+(\w+\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?)\s+to\s+(\w+\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?)").unwrap(),
            // from 28 November to 3 March
            Regex::new(r"(?i)from\s+(\d{1,2}\.?\s*\w+\.?(?:\s+\d{4})?)\s+to\s+(\d{1,2}\.?\s*\w+\.?(?:\s+\d{4})?)").unwrap(),
        ]
    })
}

/// "im Dezember" / "in december" — a whole-month query.
fn month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:im|in)\s+(januar|februar|märz|april|mai|juni|juli|august|september|oktober|november|dezember|january|february|march|may|june|july|october|december)\b",
        )
        .unwrap()
    })
}

/// Rewrite range phrases in `raw` to canonical forms. Pure and total:
/// returns the input unchanged when nothing matches or a sub-parse fails.
pub fn preprocess(raw: &str, anchor: DateTime<Tz>) -> String {
    if let Some(rewritten) = rewrite_two_sided_range(raw, &anchor) {
        return rewritten;
    }
    if let Some(rewritten) = rewrite_month_query(raw, &anchor) {
        return rewritten;
    }
    raw.to_string()
}

/// Try the "from X to Y" patterns; first structural match wins. The bounds
/// are parsed with current-period preference — the range itself determines
/// direction, and an end before the start means the range crosses into the
/// next year.
fn rewrite_two_sided_range(raw: &str, anchor: &DateTime<Tz>) -> Option<String> {
    let config = FallbackConfig {
        prefer: PreferDatesFrom::CurrentPeriod,
        ..Default::default()
    };

    for pattern in range_patterns() {
        let Some(caps) = pattern.captures(raw) else {
            continue;
        };
        let (Some(matched), Some(start_m), Some(end_m)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let start_str = start_m.as_str().trim();
        let end_str = end_m.as_str().trim();

        let start_date = parse_natural_date(start_str, anchor, &config);
        let end_date = parse_natural_date(end_str, anchor, &config);
        let (Some(start_date), Some(mut end_date)) = (start_date, end_date) else {
            tracing::warn!(start = start_str, end = end_str, "range bound did not parse");
            continue;
        };

        if end_date < start_date {
            let tz: Tz = end_date.timezone();
            let naive = end_date.naive_local();
            if let Some(next) = naive.with_year(naive.year() + 1) {
                end_date = civil_to_instant(next, tz);
                tracing::info!(year = end_date.year(), "range end moved into next year");
            }
        }

        let replacement = format!(
            "von {} bis {}",
            start_date.format("%Y-%m-%d"),
            end_date.format("%Y-%m-%d")
        );
        let mut rewritten = String::with_capacity(raw.len());
        rewritten.push_str(&raw[..matched.start()]);
        rewritten.push_str(&replacement);
        rewritten.push_str(&raw[matched.end()..]);
        return Some(rewritten);
    }
    None
}

/// Try the "in <month>" pattern: resolve the nearest future occurrence of
/// the month and rewrite to the relative-days phrase the downstream parser
/// understands. Inside the month, only the remaining days count.
fn rewrite_month_query(raw: &str, anchor: &DateTime<Tz>) -> Option<String> {
    let caps = month_pattern().captures(raw)?;
    let matched = caps.get(0)?;
    let month = month_number(&caps.get(1)?.as_str().to_lowercase())?;

    let today = anchor.date_naive();
    let mut end = last_day_of_month(anchor.year(), month)?;
    if end < today {
        // The month has fully elapsed this year — the user means next year.
        end = last_day_of_month(anchor.year() + 1, month)?;
        tracing::info!(month, year = anchor.year() + 1, "month query resolved to next year");
    }

    let days = (end - today).num_days();
    if days <= 0 {
        return None;
    }

    let replacement = format!("in den nächsten {days} Tagen");
    let mut rewritten = String::with_capacity(raw.len());
    rewritten.push_str(&raw[..matched.start()]);
    rewritten.push_str(&replacement);
    rewritten.push_str(&raw[matched.end()..]);
    Some(rewritten)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(first_next - Duration::days(1))
}
