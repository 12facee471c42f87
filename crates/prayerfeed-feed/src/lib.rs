//! Feed generation for prayerfeed.
//!
//! Builds the date window for a feed, fetches and normalizes each day,
//! and writes the resulting JSON document.

/// Date windows (rolling week, calendar year, Ramadan).
pub mod calendar;
/// Feed error taxonomy.
pub mod error;
/// Feed document and day entry types.
pub mod model;
/// Raw API field mapping to day entries.
pub mod normalize;
/// Fetch-normalize-write pipeline.
pub mod pipeline;
/// Atomic JSON output.
pub mod writer;

pub use calendar::{DateWindow, calendar_year, london_now, london_today, ramadan, rolling_week};
pub use error::FeedError;
pub use model::{DayEntry, FeedDocument, FeedKind, PrayerDay, RamadanDay, WindowDescriptor};
pub use pipeline::{generate_feed, run_feed};
pub use writer::{render_feed, write_feed};
