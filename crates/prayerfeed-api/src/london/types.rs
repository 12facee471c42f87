//! Response types for the `times` endpoint.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Flat field mapping returned for one day.
///
/// Field names are provider-defined (`fajr`, `fajr_jamat`, `asr_2`,
/// `magrib`, ...). Values are kept as raw JSON so that callers decide
/// which fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RawDayTimes(BTreeMap<String, Value>);

impl RawDayTimes {
    /// Returns the string value of `field`, if present and a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Number of fields in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawDayTimes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_day_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/london/day_2024-03-11.json");

        // Act
        let raw: RawDayTimes = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(raw.get_str("date"), Some("2024-03-11"));
        assert_eq!(raw.get_str("fajr"), Some("04:58"));
        assert_eq!(raw.get_str("magrib"), Some("18:05"));
        assert_eq!(raw.get_str("asr_2"), Some("16:07"));
    }

    #[test]
    fn test_get_str_ignores_non_string_values() {
        // Arrange
        let raw: RawDayTimes = [("fajr", Value::from(5)), ("isha", Value::Null)]
            .into_iter()
            .collect();

        // Act & Assert
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get_str("fajr"), None);
        assert_eq!(raw.get_str("isha"), None);
        assert_eq!(raw.get_str("sunrise"), None);
    }

    #[test]
    fn test_array_body_is_rejected() {
        // Arrange
        let json = r#"["fajr", "05:00"]"#;

        // Act
        let result: Result<RawDayTimes, _> = serde_json::from_str(json);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_object() {
        // Arrange & Act
        let raw: RawDayTimes = serde_json::from_str("{}").unwrap();

        // Assert
        assert!(raw.is_empty());
        assert_eq!(raw.len(), 0);
    }
}
