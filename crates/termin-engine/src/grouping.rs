//! Day-grouping of resolved events.
//!
//! Buckets an already-filtered, already-sorted event list by civil date in
//! the deployment timezone, attaching a localized weekday label per bucket
//! and local `HH:MM` start/end strings per event. This is the shape the
//! assistant renders as a calendar overview ("Montag, 01.12.: …").

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::event::EventView;
use crate::locale::{weekday_label, Language};

/// An event within a day bucket, with localized wall-clock times.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedEvent {
    #[serde(flatten)]
    pub view: EventView,
    /// Local start time, `HH:MM`.
    pub start_time_local: Option<String>,
    /// Local end time, `HH:MM`, when an end instant exists.
    pub end_time_local: Option<String>,
}

/// All events starting on one civil date.
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    /// Civil date of the bucket (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Localized weekday name for the date.
    pub weekday: String,
    /// Events in chronological order.
    pub events: Vec<GroupedEvent>,
}

/// Day-grouped result with summary counts.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedEvents {
    pub days_with_events: usize,
    pub total_events: usize,
    pub days: Vec<DayBucket>,
}

/// Bucket `views` by their start date in `tz`, ascending by date.
///
/// Events without a parseable start instant are skipped. Input order is
/// preserved within a bucket, so a list sorted by start stays sorted.
pub fn group_by_day(views: &[EventView], tz: Tz, lang: Language) -> GroupedEvents {
    // BTreeMap keeps buckets sorted by date.
    let mut buckets: BTreeMap<NaiveDate, Vec<GroupedEvent>> = BTreeMap::new();
    let mut total = 0usize;

    for view in views {
        let Some(start) = view.start_instant() else {
            continue;
        };
        let local_start = start.with_timezone(&tz);
        let end_time_local = view
            .end_instant()
            .map(|end| end.with_timezone(&tz).format("%H:%M").to_string());

        buckets
            .entry(local_start.date_naive())
            .or_default()
            .push(GroupedEvent {
                view: view.clone(),
                start_time_local: Some(local_start.format("%H:%M").to_string()),
                end_time_local,
            });
        total += 1;
    }

    let days: Vec<DayBucket> = buckets
        .into_iter()
        .map(|(date, events)| DayBucket {
            date,
            weekday: weekday_label(date.weekday(), lang).to_string(),
            events,
        })
        .collect();

    GroupedEvents {
        days_with_events: days.len(),
        total_events: total,
        days,
    }
}
