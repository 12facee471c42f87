//! Feed document and day entry types.
//!
//! Field declaration order is the JSON key order of the published files.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// IANA timezone every time in a feed is expressed in.
pub const TIMEZONE: &str = "Europe/London";

/// Upstream provider name.
pub const SOURCE_NAME: &str = "London Unified Prayer Times API";

/// Upstream provider documentation URL.
pub const SOURCE_URL: &str = "https://www.londonprayertimes.com/api";

/// Number of days in a rolling week feed.
pub const WEEK_DAYS: usize = 7;

/// Number of days in a Ramadan feed.
pub const RAMADAN_DAYS: usize = 30;

/// Feed cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Seven days starting today.
    Week,
    /// Full Gregorian calendar year.
    Year,
    /// Thirty days starting 1 Ramadan.
    Ramadan,
}

impl FeedKind {
    /// Default output file name for this feed.
    #[must_use]
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::Week => "london-prayer-times-7d.json",
            Self::Year => "london-prayer-times-1yr.json",
            Self::Ramadan => "london-ramadan-times.json",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Week => "week",
            Self::Year => "year",
            Self::Ramadan => "ramadan",
        })
    }
}

/// Window fields written between `generated_at` and `days_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WindowDescriptor {
    /// Rolling week.
    Week {
        /// First day of the window (London "today").
        effective_today: NaiveDate,
    },
    /// Calendar year.
    Year {
        /// Gregorian year.
        year: i32,
        /// January 1st.
        start_date: NaiveDate,
        /// December 31st.
        end_date: NaiveDate,
    },
    /// Ramadan month.
    Ramadan {
        /// Gregorian year the Ramadan was resolved for.
        ramadan_year: i32,
        /// 1 Ramadan.
        start_date: NaiveDate,
        /// Last day of the window.
        end_date: NaiveDate,
    },
}

impl WindowDescriptor {
    /// Feed type described by this window.
    #[must_use]
    pub const fn kind(&self) -> FeedKind {
        match self {
            Self::Week { .. } => FeedKind::Week,
            Self::Year { .. } => FeedKind::Year,
            Self::Ramadan { .. } => FeedKind::Ramadan,
        }
    }

    /// Number of days a complete feed for this window contains.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        match self {
            Self::Week { .. } => WEEK_DAYS,
            Self::Year {
                start_date,
                end_date,
                ..
            } => end_date
                .signed_duration_since(*start_date)
                .num_days()
                .checked_add(1)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or_default(),
            Self::Ramadan { .. } => RAMADAN_DAYS,
        }
    }
}

/// One day of the week or year feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerDay {
    /// Calendar day.
    pub date: NaiveDate,
    /// Fajr start.
    pub fajr: String,
    /// Fajr jama'ah.
    pub fajr_jamaah: String,
    /// Sunrise.
    pub sunrise: String,
    /// Dhuhr start.
    pub dhuhr: String,
    /// Dhuhr jama'ah.
    pub dhuhr_jamaah: String,
    /// Asr start (first shadow).
    pub asr: String,
    /// Asr start, Hanafi (second shadow).
    pub asr_hanafi: String,
    /// Asr jama'ah.
    pub asr_jamaah: String,
    /// Maghrib start.
    pub maghrib: String,
    /// Maghrib jama'ah.
    pub maghrib_jamaah: String,
    /// Isha start.
    pub isha: String,
    /// Isha jama'ah.
    pub isha_jamaah: String,
}

/// One day of the Ramadan feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RamadanDay {
    /// Calendar day.
    pub date: NaiveDate,
    /// 1-based day of Ramadan.
    pub ramadan_day: u32,
    /// Fajr start.
    pub fajr: String,
    /// End of suhoor (same as `fajr`).
    pub suhoor_end: String,
    /// Sunrise.
    pub sunrise: String,
    /// Dhuhr start.
    pub dhuhr: String,
    /// Asr start (first shadow).
    pub asr: String,
    /// Asr start, Hanafi (second shadow).
    pub asr_hanafi: String,
    /// Maghrib start.
    pub maghrib: String,
    /// Iftar (same as `maghrib`).
    pub iftar: String,
    /// Isha start.
    pub isha: String,
}

/// A normalized day in any feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DayEntry {
    /// Week/year schema.
    Prayer(PrayerDay),
    /// Ramadan schema.
    Ramadan(RamadanDay),
}

impl DayEntry {
    /// Calendar day of the entry.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Prayer(day) => day.date,
            Self::Ramadan(day) => day.date,
        }
    }
}

/// Provider attribution block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Provider name.
    pub name: &'static str,
    /// Provider URL.
    pub url: &'static str,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            name: SOURCE_NAME,
            url: SOURCE_URL,
        }
    }
}

/// A complete feed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedDocument {
    source: Source,
    timezone: &'static str,
    generated_at: String,
    #[serde(flatten)]
    window: WindowDescriptor,
    days_count: usize,
    days: Vec<DayEntry>,
}

impl FeedDocument {
    /// Assembles a feed document.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::WindowSize` if `days` does not contain exactly
    /// the number of entries the window calls for.
    pub fn new(
        window: WindowDescriptor,
        generated_at: &DateTime<Tz>,
        days: Vec<DayEntry>,
    ) -> Result<Self, FeedError> {
        let expected = window.expected_len();
        if days.len() != expected {
            return Err(FeedError::WindowSize {
                kind: window.kind(),
                expected,
                actual: days.len(),
            });
        }

        Ok(Self {
            source: Source::default(),
            timezone: TIMEZONE,
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            window,
            days_count: days.len(),
            days,
        })
    }

    /// Window descriptor.
    #[must_use]
    pub const fn window(&self) -> &WindowDescriptor {
        &self.window
    }

    /// Generation timestamp as written.
    #[must_use]
    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    /// Number of days.
    #[must_use]
    pub const fn days_count(&self) -> usize {
        self.days_count
    }

    /// Day entries in date order.
    #[must_use]
    pub fn days(&self) -> &[DayEntry] {
        &self.days
    }
}
