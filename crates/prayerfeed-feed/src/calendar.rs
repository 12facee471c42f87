//! Date windows for each feed cadence.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Europe::London;
use chrono_tz::Tz;
use hijri_date::HijriDate;

use crate::error::FeedError;
use crate::model::{FeedKind, RAMADAN_DAYS, WEEK_DAYS, WindowDescriptor};

/// Earliest Gregorian year the Hijri tables cover.
pub const HIJRI_MIN_YEAR: i32 = 1938;

/// Latest Gregorian year the Hijri tables cover.
pub const HIJRI_MAX_YEAR: i32 = 2076;

/// Hijri month number of Ramadan.
const RAMADAN_MONTH: usize = 9;

/// Current instant in Europe/London.
#[must_use]
pub fn london_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&London)
}

/// Today's date in Europe/London.
#[must_use]
pub fn london_today() -> NaiveDate {
    london_now().date_naive()
}

/// Gregorian leap-year test.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// A Hijri calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HijriDay {
    /// Hijri year (AH).
    pub year: usize,
    /// Hijri month, 1-based.
    pub month: usize,
    /// Day of month, 1-based.
    pub day: usize,
}

/// Ordered, contiguous dates of one feed plus the fields describing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    descriptor: WindowDescriptor,
    dates: Vec<NaiveDate>,
}

impl DateWindow {
    /// Window descriptor written into the feed document.
    #[must_use]
    pub const fn descriptor(&self) -> &WindowDescriptor {
        &self.descriptor
    }

    /// Feed type.
    #[must_use]
    pub const fn kind(&self) -> FeedKind {
        self.descriptor.kind()
    }

    /// Dates in ascending order.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` if the window has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Collects `count` consecutive dates starting at `start`.
fn consecutive(start: NaiveDate, count: usize) -> Result<Vec<NaiveDate>, FeedError> {
    let dates: Vec<NaiveDate> = start.iter_days().take(count).collect();
    if dates.len() != count {
        return Err(FeedError::calendar(format!(
            "cannot build {count} consecutive days from {start}"
        )));
    }
    Ok(dates)
}

/// Seven consecutive days starting at `today`.
///
/// # Errors
///
/// Returns `FeedError::Calendar` if the window runs past the last
/// representable date.
pub fn rolling_week(today: NaiveDate) -> Result<DateWindow, FeedError> {
    Ok(DateWindow {
        descriptor: WindowDescriptor::Week {
            effective_today: today,
        },
        dates: consecutive(today, WEEK_DAYS)?,
    })
}

/// January 1st through December 31st of `year`.
///
/// # Errors
///
/// Returns `FeedError::Calendar` if `year` is not representable.
pub fn calendar_year(year: i32) -> Result<DateWindow, FeedError> {
    let start_date = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| FeedError::calendar(format!("invalid year {year}")))?;
    let end_date = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| FeedError::calendar(format!("invalid year {year}")))?;

    let dates: Vec<NaiveDate> = start_date
        .iter_days()
        .take_while(|d| *d <= end_date)
        .collect();

    Ok(DateWindow {
        descriptor: WindowDescriptor::Year {
            year,
            start_date,
            end_date,
        },
        dates,
    })
}

/// Converts a Gregorian date to Hijri.
///
/// # Errors
///
/// Returns `FeedError::Calendar` if the date is outside 1938-2076 or
/// the conversion tables cannot resolve it.
pub fn hijri_of(date: NaiveDate) -> Result<HijriDay, FeedError> {
    if !(HIJRI_MIN_YEAR..=HIJRI_MAX_YEAR).contains(&date.year()) {
        return Err(FeedError::calendar(format!(
            "{date} is outside the supported range ({HIJRI_MIN_YEAR}-{HIJRI_MAX_YEAR})"
        )));
    }

    let unresolved = || FeedError::calendar(format!("cannot convert {date} to Hijri"));
    let year = usize::try_from(date.year()).map_err(|_| unresolved())?;
    let month = usize::try_from(date.month()).map_err(|_| unresolved())?;
    let day = usize::try_from(date.day()).map_err(|_| unresolved())?;

    let hijri = HijriDate::from_gr(year, month, day).map_err(|_| unresolved())?;
    Ok(HijriDay {
        year: hijri.year(),
        month: hijri.month(),
        day: hijri.day(),
    })
}

/// Finds 1 Ramadan for a Gregorian year.
///
/// Days are scanned from December 1st of the previous year, so a Ramadan
/// that begins in late December is attributed to the following year.
///
/// # Errors
///
/// Returns `FeedError::Calendar` if a date cannot be converted or no
/// Ramadan start falls inside the scanned range.
pub fn ramadan_start(year: i32) -> Result<NaiveDate, FeedError> {
    if !(HIJRI_MIN_YEAR..=HIJRI_MAX_YEAR).contains(&year) {
        return Err(FeedError::calendar(format!(
            "year {year} is outside the supported range ({HIJRI_MIN_YEAR}-{HIJRI_MAX_YEAR})"
        )));
    }

    let scan_start = year
        .checked_sub(1)
        .filter(|prev| *prev >= HIJRI_MIN_YEAR)
        .and_then(|prev| NaiveDate::from_ymd_opt(prev, 12, 1))
        .or_else(|| NaiveDate::from_ymd_opt(year, 1, 1))
        .ok_or_else(|| FeedError::calendar(format!("invalid year {year}")))?;
    let scan_end = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| FeedError::calendar(format!("invalid year {year}")))?;

    for date in scan_start.iter_days().take_while(|d| *d <= scan_end) {
        let hijri = hijri_of(date)?;
        if hijri.month == RAMADAN_MONTH && hijri.day == 1 {
            tracing::debug!(%date, hijri_year = hijri.year, "found 1 Ramadan");
            return Ok(date);
        }
    }

    Err(FeedError::calendar(format!(
        "no Ramadan start found for {year}"
    )))
}

/// Thirty consecutive days starting 1 Ramadan of `year`.
///
/// # Errors
///
/// Returns `FeedError::Calendar` if the Ramadan start cannot be resolved.
pub fn ramadan(year: i32) -> Result<DateWindow, FeedError> {
    let start_date = ramadan_start(year)?;
    let dates = consecutive(start_date, RAMADAN_DAYS)?;
    let end_date = dates
        .last()
        .copied()
        .ok_or_else(|| FeedError::calendar("empty Ramadan window"))?;

    Ok(DateWindow {
        descriptor: WindowDescriptor::Ramadan {
            ramadan_year: year,
            start_date,
            end_date,
        },
        dates,
    })
}
