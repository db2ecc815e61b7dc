//! Event window resolution: filter, sort, and bound a list of scheduled
//! events against a requested time window.
//!
//! The window end is determined with a strict precedence: an explicit
//! `days_ahead` wins over an explicit `to` instant, which wins over a
//! [`Timeframe`] preset (presets are just a named shorthand for
//! `days_ahead`). When a `to` bound parsed independently lands before the
//! window start, it is assumed to mean the following year — the same
//! cross-year heuristic the range preprocessor applies.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventView};

/// Named timeframe shorthand, resolved to a day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Today,
    Tomorrow,
    Week,
    #[serde(rename = "2weeks")]
    TwoWeeks,
    Month,
}

impl Timeframe {
    /// The `days_ahead` this preset stands for.
    pub fn days_ahead(self) -> i64 {
        match self {
            Timeframe::Today => 1,
            Timeframe::Tomorrow => 2,
            Timeframe::Week => 7,
            Timeframe::TwoWeeks => 14,
            Timeframe::Month => 30,
        }
    }

    /// Parse a preset name coming from the intent router. Unknown names
    /// fall back to a week, matching the deployed router behavior.
    pub fn from_name(name: &str) -> Timeframe {
        match name.trim().to_lowercase().as_str() {
            "today" => Timeframe::Today,
            "tomorrow" => Timeframe::Tomorrow,
            "2weeks" => Timeframe::TwoWeeks,
            "month" => Timeframe::Month,
            _ => Timeframe::Week,
        }
    }
}

/// Requested filter window.
///
/// Exactly one of `days_ahead`, `to`, `timeframe` governs the end bound,
/// in that precedence order.
#[derive(Debug, Clone, Default)]
pub struct WindowSpec {
    /// Explicit start; defaults to the anchor when absent.
    pub from: Option<DateTime<Utc>>,
    /// Explicit end instant.
    pub to: Option<DateTime<Utc>>,
    /// End bound as a day count from the anchor.
    pub days_ahead: Option<i64>,
    /// Preset shorthand for `days_ahead`.
    pub timeframe: Option<Timeframe>,
    /// Case-insensitive location substring filter.
    pub location: Option<String>,
    /// Maximum number of events returned; `None` means the default of 50.
    pub limit: Option<usize>,
}

pub const DEFAULT_LIMIT: usize = 50;

/// The bounds actually applied, echoed back in responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedWindow {
    pub from: DateTime<Utc>,
    pub to: Option<DateTime<Utc>>,
    pub days_ahead: Option<i64>,
    pub preset: Option<Timeframe>,
}

/// Result of window resolution: the applied bounds plus the surviving
/// events, sorted ascending by start.
#[derive(Debug, Clone, Serialize)]
pub struct WindowedEvents {
    pub count: usize,
    pub window: AppliedWindow,
    pub location_filter: Option<String>,
    pub events: Vec<EventView>,
}

/// Filter `events` against `spec`, anchored at `anchor`.
///
/// Events without a parseable start instant are dropped. An empty result
/// is a successful result, never an error.
pub fn resolve_window(events: &[Event], spec: &WindowSpec, anchor: DateTime<Utc>) -> WindowedEvents {
    let start_filter = spec.from.unwrap_or(anchor);

    // End bound precedence: days_ahead > to > preset.
    let (effective_days, end_filter) = if let Some(days) = spec.days_ahead {
        (Some(days), Some(anchor + Duration::days(days)))
    } else if let Some(to) = spec.to {
        let end = if to < start_filter {
            // Independent parses like "28. November" / "3. März" put the
            // end before the start; the range must cross the year boundary.
            let corrected = roll_year_forward(to);
            tracing::info!(%to, %corrected, "end bound rolled into next year");
            corrected
        } else {
            to
        };
        (None, Some(end))
    } else if let Some(preset) = spec.timeframe {
        let days = preset.days_ahead();
        (Some(days), Some(anchor + Duration::days(days)))
    } else {
        (None, None)
    };

    let mut kept: Vec<(DateTime<Utc>, EventView)> = events
        .iter()
        .filter_map(|event| {
            let start = event.start_instant()?;
            if start < start_filter {
                return None;
            }
            if let Some(end) = end_filter {
                if start > end {
                    return None;
                }
            }
            if let Some(filter) = spec.location.as_deref() {
                if !location_matches(event.location(), filter) {
                    return None;
                }
            }
            Some((start, EventView::from_event(event)))
        })
        .collect();

    kept.sort_by_key(|(start, _)| *start);
    kept.truncate(spec.limit.unwrap_or(DEFAULT_LIMIT));

    WindowedEvents {
        count: kept.len(),
        window: AppliedWindow {
            from: start_filter,
            to: end_filter,
            days_ahead: effective_days,
            preset: spec.timeframe,
        },
        location_filter: spec.location.clone(),
        events: kept.into_iter().map(|(_, view)| view).collect(),
    }
}

/// Symmetric, case-insensitive substring match: the event location may
/// contain the filter or the filter may contain the event location
/// ("Labor" matches "Labor X", and "Labor X Erweiterung" matches "Labor X").
/// Events without a location never match an active filter.
fn location_matches(event_location: Option<&str>, filter: &str) -> bool {
    let Some(location) = event_location else {
        return false;
    };
    let location = location.to_lowercase();
    let filter = filter.to_lowercase();
    location.contains(&filter) || filter.contains(&location)
}

/// Shift an instant one calendar year forward. Feb 29 collapses to Feb 28.
fn roll_year_forward(instant: DateTime<Utc>) -> DateTime<Utc> {
    let naive = instant.naive_utc();
    naive
        .with_year(naive.year() + 1)
        .or_else(|| {
            naive
                .with_day(28)
                .and_then(|d| d.with_year(d.year() + 1))
        })
        .map(|n| Utc.from_utc_datetime(&n))
        .unwrap_or(instant)
}

/// The full civil day containing `instant` in `tz`, as a UTC window.
///
/// Used by the "events on a specific day" flow: a parsed date like
/// "in 14 Tagen" widens to `[00:00, next day 00:00)` of that civil day.
pub fn day_window(instant: DateTime<Utc>, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let civil_date = instant.with_timezone(&tz).date_naive();
    let start = crate::clock::civil_to_instant(civil_date.and_time(chrono::NaiveTime::MIN), tz);
    let end = crate::clock::civil_to_instant(
        (civil_date + Duration::days(1)).and_time(chrono::NaiveTime::MIN),
        tz,
    );
    (start.with_timezone(&Utc), end.with_timezone(&Utc))
}
