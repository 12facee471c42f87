//! Maps the provider's raw field names onto the feed schemas.

use chrono::{NaiveDate, NaiveTime};
use prayerfeed_api::london::RawDayTimes;

use crate::error::FeedError;
use crate::model::{DayEntry, FeedKind, PrayerDay, RamadanDay};

/// Returns `true` for a zero-padded 24-hour `HH:MM` string.
#[must_use]
pub fn is_hh_mm(value: &str) -> bool {
    value.len() == 5
        && value.as_bytes().get(2) == Some(&b':')
        && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

/// Reads a required time field, trimmed and validated.
fn required_time(
    raw: &RawDayTimes,
    date: NaiveDate,
    field: &'static str,
) -> Result<String, FeedError> {
    let value = raw
        .get_str(field)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(FeedError::MissingField { date, field })?;

    if !is_hh_mm(value) {
        return Err(FeedError::MalformedTime {
            date,
            field,
            value: String::from(value),
        });
    }
    Ok(String::from(value))
}

/// Builds a week/year day entry.
///
/// # Errors
///
/// Returns `MissingField` or `MalformedTime` naming the first bad field.
pub fn normalize_prayer_day(date: NaiveDate, raw: &RawDayTimes) -> Result<PrayerDay, FeedError> {
    Ok(PrayerDay {
        date,
        fajr: required_time(raw, date, "fajr")?,
        fajr_jamaah: required_time(raw, date, "fajr_jamat")?,
        sunrise: required_time(raw, date, "sunrise")?,
        dhuhr: required_time(raw, date, "dhuhr")?,
        dhuhr_jamaah: required_time(raw, date, "dhuhr_jamat")?,
        asr: required_time(raw, date, "asr")?,
        asr_hanafi: required_time(raw, date, "asr_2")?,
        asr_jamaah: required_time(raw, date, "asr_jamat")?,
        maghrib: required_time(raw, date, "magrib")?,
        maghrib_jamaah: required_time(raw, date, "magrib_jamat")?,
        isha: required_time(raw, date, "isha")?,
        isha_jamaah: required_time(raw, date, "isha_jamat")?,
    })
}

/// Builds a Ramadan day entry.
///
/// Suhoor ends at Fajr and Iftar is at Maghrib.
///
/// # Errors
///
/// Returns `MissingField` or `MalformedTime` naming the first bad field.
pub fn normalize_ramadan_day(
    date: NaiveDate,
    raw: &RawDayTimes,
    ramadan_day: u32,
) -> Result<RamadanDay, FeedError> {
    let fajr = required_time(raw, date, "fajr")?;
    let sunrise = required_time(raw, date, "sunrise")?;
    let dhuhr = required_time(raw, date, "dhuhr")?;
    let asr = required_time(raw, date, "asr")?;
    let asr_hanafi = required_time(raw, date, "asr_2")?;
    let maghrib = required_time(raw, date, "magrib")?;
    let isha = required_time(raw, date, "isha")?;

    Ok(RamadanDay {
        date,
        ramadan_day,
        suhoor_end: fajr.clone(),
        fajr,
        sunrise,
        dhuhr,
        asr,
        asr_hanafi,
        iftar: maghrib.clone(),
        maghrib,
        isha,
    })
}

/// Normalizes one day for the given feed.
///
/// `position` is the 1-based index of `date` in its window and becomes
/// `ramadan_day` for the Ramadan feed.
///
/// # Errors
///
/// Returns `MissingField` or `MalformedTime`, or `Calendar` if `position`
/// does not fit a day number.
pub fn normalize(
    kind: FeedKind,
    date: NaiveDate,
    raw: &RawDayTimes,
    position: usize,
) -> Result<DayEntry, FeedError> {
    match kind {
        FeedKind::Week | FeedKind::Year => normalize_prayer_day(date, raw).map(DayEntry::Prayer),
        FeedKind::Ramadan => {
            let ramadan_day = u32::try_from(position)
                .map_err(|_| FeedError::calendar(format!("invalid Ramadan day {position}")))?;
            normalize_ramadan_day(date, raw, ramadan_day).map(DayEntry::Ramadan)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::Value;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    fn fixture() -> RawDayTimes {
        serde_json::from_str(include_str!(
            "../../../fixtures/london/day_2024-03-11.json"
        ))
        .unwrap()
    }

    fn without(field: &str) -> RawDayTimes {
        let value: Value =
            serde_json::from_str(include_str!("../../../fixtures/london/day_2024-03-11.json"))
                .unwrap();
        let Value::Object(map) = value else {
            panic!("fixture must be an object");
        };
        map.into_iter().filter(|(k, _)| k != field).collect()
    }

    fn with(field: &str, value: Value) -> RawDayTimes {
        let base: Value =
            serde_json::from_str(include_str!("../../../fixtures/london/day_2024-03-11.json"))
                .unwrap();
        let Value::Object(mut map) = base else {
            panic!("fixture must be an object");
        };
        map.insert(String::from(field), value);
        map.into_iter().collect()
    }

    #[test]
    fn test_is_hh_mm() {
        // Arrange & Act & Assert
        assert!(is_hh_mm("00:00"));
        assert!(is_hh_mm("23:59"));
        assert!(!is_hh_mm("24:00"));
        assert!(!is_hh_mm("4:58"));
        assert!(!is_hh_mm("04:60"));
        assert!(!is_hh_mm("04.58"));
        assert!(!is_hh_mm("04:58 pm"));
    }

    #[test]
    fn test_prayer_day_renames_fields() {
        // Arrange
        let raw = fixture();

        // Act
        let day = normalize_prayer_day(date(), &raw).unwrap();

        // Assert
        assert_eq!(day.date, date());
        assert_eq!(day.fajr, "04:58");
        assert_eq!(day.fajr_jamaah, "05:30");
        assert_eq!(day.asr_hanafi, "16:07");
        assert_eq!(day.maghrib, "18:05");
        assert_eq!(day.maghrib_jamaah, "18:10");
        assert_eq!(day.isha_jamaah, "19:45");
    }

    #[test]
    fn test_ramadan_day_aliases() {
        // Arrange
        let raw = fixture();

        // Act
        let day = normalize_ramadan_day(date(), &raw, 1).unwrap();

        // Assert
        assert_eq!(day.ramadan_day, 1);
        assert_eq!(day.suhoor_end, day.fajr);
        assert_eq!(day.iftar, day.maghrib);
        assert_eq!(day.iftar, "18:05");
    }

    #[test]
    fn test_ramadan_day_does_not_need_jamaah_fields() {
        // Arrange
        let raw = without("isha_jamat");

        // Act
        let result = normalize(FeedKind::Ramadan, date(), &raw, 3);

        // Assert
        let DayEntry::Ramadan(day) = result.unwrap() else {
            panic!("expected Ramadan entry");
        };
        assert_eq!(day.ramadan_day, 3);
    }

    #[test]
    fn test_missing_fajr_names_date_and_field() {
        // Arrange
        let raw = without("fajr");

        // Act
        let err = normalize(FeedKind::Week, date(), &raw, 1).unwrap_err();

        // Assert
        assert!(matches!(
            err,
            FeedError::MissingField { field: "fajr", .. }
        ));
        let message = err.to_string();
        assert!(message.contains("2024-03-11"));
        assert!(message.contains("fajr"));
    }

    #[test]
    fn test_empty_and_null_values_count_as_missing() {
        // Arrange
        let empty = with("dhuhr", Value::from(""));
        let null = with("dhuhr", Value::Null);

        // Act & Assert
        for raw in [empty, null] {
            assert!(matches!(
                normalize_prayer_day(date(), &raw),
                Err(FeedError::MissingField { field: "dhuhr", .. })
            ));
        }
    }

    #[test]
    fn test_twelve_hour_value_is_malformed() {
        // Arrange
        let raw = with("isha", Value::from("7:25 pm"));

        // Act
        let err = normalize_prayer_day(date(), &raw).unwrap_err();

        // Assert
        assert!(matches!(
            err,
            FeedError::MalformedTime { field: "isha", ref value, .. } if value == "7:25 pm"
        ));
    }

    #[test]
    fn test_values_are_trimmed() {
        // Arrange
        let raw = with("sunrise", Value::from(" 06:21 "));

        // Act
        let day = normalize_prayer_day(date(), &raw).unwrap();

        // Assert
        assert_eq!(day.sunrise, "06:21");
    }
}
