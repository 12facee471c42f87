//! `FeedError` definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::FeedKind;

/// Errors that abort a feed run.
///
/// Every variant is fatal: nothing is retried and no output is written.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum FeedError {
    /// The upstream API request for a date failed (network, auth, HTTP status or decode).
    #[error("failed to fetch prayer times for {date}")]
    Upstream {
        /// Requested date.
        date: NaiveDate,
        /// Underlying client error.
        #[source]
        source: anyhow::Error,
    },

    /// A required source field is absent, null, non-string or empty.
    #[error("prayer times for {date} are missing required field `{field}`")]
    MissingField {
        /// Date of the offending response.
        date: NaiveDate,
        /// Provider field name.
        field: &'static str,
    },

    /// A source field is present but not an `HH:MM` 24-hour time.
    #[error("prayer times for {date} have malformed `{field}` value {value:?} (expected HH:MM)")]
    MalformedTime {
        /// Date of the offending response.
        date: NaiveDate,
        /// Provider field name.
        field: &'static str,
        /// Value as received.
        value: String,
    },

    /// Gregorian/Hijri conversion failed or a window could not be built.
    #[error("calendar conversion failed: {reason}")]
    Calendar {
        /// Human-readable cause.
        reason: String,
    },

    /// The number of day entries does not match the window size.
    #[error("{kind} feed expects {expected} days but got {actual}")]
    WindowSize {
        /// Feed type.
        kind: FeedKind,
        /// Expected day count.
        expected: usize,
        /// Actual day count.
        actual: usize,
    },

    /// The feed document could not be serialized.
    #[error("failed to serialize feed document")]
    Serialize(#[from] serde_json::Error),

    /// The output file could not be written.
    #[error("failed to write {}", path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    /// Creates a `Calendar` error.
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::Calendar {
            reason: reason.into(),
        }
    }

    /// Returns the date the error refers to, if any.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Upstream { date, .. }
            | Self::MissingField { date, .. }
            | Self::MalformedTime { date, .. } => Some(*date),
            _ => None,
        }
    }
}
