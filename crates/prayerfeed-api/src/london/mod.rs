//! London Unified Prayer Times API client module.
//!
//! Issues one `times` request per calendar day and returns the
//! provider's flat field mapping untouched.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalPrayerTimesApi, PrayerTimesApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, PrayerTimesClient, PrayerTimesClientBuilder};
pub use types::RawDayTimes;
