//! `PrayerTimesApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use chrono::NaiveDate;

use super::types::RawDayTimes;

/// London Unified Prayer Times API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(PrayerTimesApi: Send)]
pub trait LocalPrayerTimesApi {
    /// Fetches the raw prayer-time fields for a single day.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the key is rejected,
    /// or the body is not a JSON object.
    async fn day_times(&self, date: NaiveDate) -> Result<RawDayTimes>;
}
