//! Explicit, injected event cache.
//!
//! The event source is an external REST collaborator; callers that poll it
//! keep a short-lived snapshot here and pass the cache into resolution glue
//! instead of re-fetching. The cache is plain request-scoped state with an
//! explicit validity contract — there is no process-wide cache in this
//! crate, and resolution functions themselves never consult one.

use chrono::{DateTime, Duration, Utc};

use crate::event::Event;

/// Default snapshot lifetime, matching the deployed refresh interval.
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// A TTL-bounded snapshot of scheduled events.
#[derive(Debug, Clone)]
pub struct EventCache {
    events: Vec<Event>,
    fetched_at: Option<DateTime<Utc>>,
    ttl: Duration,
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_TTL_MINUTES))
    }
}

impl EventCache {
    /// An empty, invalid cache with the given lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            events: Vec::new(),
            fetched_at: None,
            ttl,
        }
    }

    /// Whether the snapshot is present and younger than the TTL at `now`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        match self.fetched_at {
            Some(at) => now - at < self.ttl,
            None => false,
        }
    }

    /// Replace the snapshot.
    pub fn update(&mut self, events: Vec<Event>, now: DateTime<Utc>) {
        tracing::debug!(count = events.len(), "event cache updated");
        self.events = events;
        self.fetched_at = Some(now);
    }

    /// Drop the snapshot; subsequent `is_valid` is false until `update`.
    pub fn invalidate(&mut self) {
        self.events.clear();
        self.fetched_at = None;
    }

    /// The snapshot, but only while valid. A stale cache yields `None`,
    /// which tells the caller to re-fetch and `update`.
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&[Event]> {
        self.is_valid(now).then_some(self.events.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 28, 9, 0, 0).unwrap()
    }

    fn sample_event() -> Event {
        Event {
            id: "1".into(),
            name: "sample".into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_cache_is_invalid() {
        let cache = EventCache::default();
        assert!(!cache.is_valid(now()));
        assert!(cache.fresh(now()).is_none());
    }

    #[test]
    fn updated_cache_is_valid_within_ttl() {
        let mut cache = EventCache::default();
        cache.update(vec![sample_event()], now());
        assert!(cache.is_valid(now() + Duration::minutes(4)));
        assert_eq!(cache.fresh(now()).unwrap().len(), 1);
    }

    #[test]
    fn cache_expires_after_ttl() {
        let mut cache = EventCache::default();
        cache.update(vec![sample_event()], now());
        assert!(!cache.is_valid(now() + Duration::minutes(5)));
        assert!(cache.fresh(now() + Duration::minutes(6)).is_none());
    }

    #[test]
    fn invalidate_clears_snapshot() {
        let mut cache = EventCache::default();
        cache.update(vec![sample_event()], now());
        cache.invalidate();
        assert!(!cache.is_valid(now()));
    }
}
