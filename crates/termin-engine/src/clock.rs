//! Deployment timezone and civil↔UTC conversion.
//!
//! Resolution functions in this crate never read the system clock — the
//! caller provides the "now" anchor, keeping everything testable. The only
//! clock access in the whole crate is [`civil_now`], intended for binaries
//! and glue code at the edge.
//!
//! The deployment timezone is a parameter everywhere it matters, with
//! [`default_timezone`] (Europe/Berlin) as the configured default.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The deployment's civil timezone.
pub fn default_timezone() -> Tz {
    chrono_tz::Europe::Berlin
}

/// Current wall-clock time in `tz`. Edge-only; core functions take anchors.
pub fn civil_now(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Map a naive civil datetime to an instant in `tz`, DST-correct.
///
/// Ambiguous wall-clock times (the repeated hour when clocks fall back)
/// resolve to the earlier offset. Times inside a spring-forward gap shift
/// forward one hour, landing on the first valid wall-clock moment.
pub fn civil_to_instant(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _later) => earlier,
        LocalResult::None => {
            // Inside the gap: Europe/Berlin (and every IANA zone this
            // deployment cares about) has one-hour transitions.
            let shifted = naive + chrono::Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) => dt,
                LocalResult::Ambiguous(earlier, _) => earlier,
                LocalResult::None => tz.from_utc_datetime(&naive),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn berlin_winter_offset() {
        let naive = NaiveDate::from_ymd_opt(2025, 12, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let dt = civil_to_instant(naive, default_timezone());
        // CET = UTC+1
        assert_eq!(dt.with_timezone(&Utc).to_rfc3339(), "2025-12-01T14:00:00+00:00");
    }

    #[test]
    fn berlin_summer_offset() {
        let naive = NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let dt = civil_to_instant(naive, default_timezone());
        // CEST = UTC+2
        assert_eq!(dt.with_timezone(&Utc).to_rfc3339(), "2025-07-01T13:00:00+00:00");
    }

    #[test]
    fn spring_forward_gap_shifts_one_hour() {
        // 2025-03-30 02:30 does not exist in Europe/Berlin.
        let naive = NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let dt = civil_to_instant(naive, default_timezone());
        assert_eq!(dt.naive_local().format("%H:%M").to_string(), "03:30");
    }

    #[test]
    fn fall_back_ambiguity_takes_earlier_offset() {
        // 2025-10-26 02:30 occurs twice; the earlier one is still CEST.
        let naive = NaiveDate::from_ymd_opt(2025, 10, 26)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let dt = civil_to_instant(naive, default_timezone());
        assert_eq!(dt.with_timezone(&Utc).to_rfc3339(), "2025-10-26T00:30:00+00:00");
    }
}
