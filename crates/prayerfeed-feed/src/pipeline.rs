//! Fetch, normalize and write a feed in one linear pass.

use std::path::Path;

use chrono::DateTime;
use chrono_tz::Tz;
use prayerfeed_api::london::LocalPrayerTimesApi;
use tracing::instrument;

use crate::calendar::DateWindow;
use crate::error::FeedError;
use crate::model::FeedDocument;
use crate::normalize::normalize;
use crate::writer::write_feed;

/// Fetches every date of `window` in order and builds the feed document.
///
/// Requests are issued one at a time. The first failure aborts the run.
///
/// # Errors
///
/// Returns `FeedError::Upstream` for client failures, `MissingField` or
/// `MalformedTime` for bad responses, and `WindowSize` if the day count
/// does not match the window.
#[instrument(skip_all, fields(kind = %window.kind(), days = window.len()))]
pub async fn generate_feed(
    api: &(impl LocalPrayerTimesApi + Sync),
    window: &DateWindow,
    generated_at: &DateTime<Tz>,
) -> Result<FeedDocument, FeedError> {
    let kind = window.kind();
    let mut days = Vec::with_capacity(window.len());

    for (index, &date) in window.dates().iter().enumerate() {
        let raw = api
            .day_times(date)
            .await
            .map_err(|source| FeedError::Upstream { date, source })?;
        let entry = normalize(kind, date, &raw, index.saturating_add(1))?;
        tracing::debug!(%date, "day normalized");
        days.push(entry);
    }

    FeedDocument::new(window.descriptor().clone(), generated_at, days)
}

/// Generates a feed and writes it to `path`.
///
/// Nothing is written unless every date was fetched and normalized.
///
/// # Errors
///
/// Returns any error from [`generate_feed`] or [`write_feed`].
pub async fn run_feed(
    api: &(impl LocalPrayerTimesApi + Sync),
    window: &DateWindow,
    generated_at: &DateTime<Tz>,
    path: &Path,
) -> Result<FeedDocument, FeedError> {
    let doc = generate_feed(api, window, generated_at)
        .await
        .inspect_err(|err| {
            if let Some(date) = err.date() {
                tracing::warn!(
                    %date,
                    "{} feed stopped; {} left unchanged",
                    window.kind(),
                    path.display()
                );
            }
        })?;
    write_feed(path, &doc)?;
    tracing::info!(
        "Wrote {} ({} {} days)",
        path.display(),
        doc.days_count(),
        window.kind()
    );
    Ok(doc)
}
