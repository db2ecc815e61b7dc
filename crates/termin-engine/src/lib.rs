//! # termin-engine
//!
//! Deterministic bilingual (German/English) temporal computation for a
//! scheduling assistant: natural-language time expression parsing, range
//! preprocessing, and event-window resolution over Discord scheduled
//! events.
//!
//! All resolution is pure computation over explicit inputs — the caller
//! provides the "now" anchor and the event list, so every function is
//! reproducible in tests and safe to call concurrently. Civil wall-clock
//! times live in a configurable IANA timezone (Europe/Berlin by default);
//! instants are always UTC.
//!
//! ## Modules
//!
//! - [`parser`] — free-text time expression + duration → absolute UTC window
//! - [`preprocess`] — rewrite "vom X bis Y" / "im `<Monat>`" phrases into canonical forms
//! - [`fallback`] — best-effort calendar-date parsing behind the keyword rules
//! - [`window`] — filter/sort/bound scheduled events against a requested window
//! - [`grouping`] — bucket resolved events by civil day with localized labels
//! - [`event`] — the Discord scheduled-event wire shape and response views
//! - [`cache`] — explicit TTL snapshot of the external event list
//! - [`clock`] — deployment timezone and DST-correct civil↔UTC conversion
//! - [`locale`] — the bilingual keyword tables
//! - [`error`] — error types

pub mod cache;
pub mod clock;
pub mod error;
pub mod event;
pub mod fallback;
pub mod grouping;
pub mod locale;
pub mod parser;
pub mod preprocess;
pub mod window;

pub use cache::EventCache;
pub use clock::{civil_now, civil_to_instant, default_timezone};
pub use error::TemporalError;
pub use event::{Event, EventView};
pub use fallback::{parse_natural_date, DateOrder, FallbackConfig, PreferDatesFrom};
pub use grouping::{group_by_day, DayBucket, GroupedEvents};
pub use locale::Language;
pub use parser::{parse_time, ParsedWindow};
pub use preprocess::preprocess;
pub use window::{day_window, resolve_window, Timeframe, WindowSpec, WindowedEvents};
