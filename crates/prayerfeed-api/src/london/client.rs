//! `PrayerTimesClient` - London Unified Prayer Times API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalPrayerTimesApi;
use super::rate_limiter::PacingLimiter;
use super::types::RawDayTimes;

/// Default base URL for the `times` endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.londonprayertimes.com/api/times/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Maximum number of body bytes echoed back in error messages.
const ERROR_BODY_PREVIEW: usize = 300;

/// London Unified Prayer Times API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct PrayerTimesClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL of the `times` endpoint.
    base_url: Url,
    /// API access key, sent as the `key` query parameter.
    api_key: String,
    /// Request pacing.
    limiter: Arc<Mutex<PacingLimiter>>,
}

/// Builder for `PrayerTimesClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct PrayerTimesClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    min_interval: Option<Duration>,
}

impl PrayerTimesClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 20s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the minimum request interval (default: 100ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<PrayerTimesClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be blank");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let limiter = self
            .min_interval
            .map_or_else(PacingLimiter::default_interval, PacingLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(PrayerTimesClient {
            http_client,
            base_url,
            api_key: String::from(api_key.trim()),
            limiter: Arc::new(Mutex::new(limiter)),
        })
    }
}

impl PrayerTimesClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> PrayerTimesClientBuilder {
        PrayerTimesClientBuilder::new()
    }

    /// Decodes a `times` response body into a flat field mapping.
    pub(crate) fn parse_day_response(body: &str, date: NaiveDate) -> Result<RawDayTimes> {
        let raw_result: std::result::Result<RawDayTimes, _> = serde_json::from_str(body);
        raw_result.with_context(|| {
            format!(
                "failed to decode prayer times response for {date} (len={}): {}",
                body.len(),
                preview(body),
            )
        })
    }
}

/// Truncates a response body for inclusion in error messages.
fn preview(body: &str) -> &str {
    body.get(..body.floor_char_boundary(ERROR_BODY_PREVIEW))
        .unwrap_or_default()
}

impl LocalPrayerTimesApi for PrayerTimesClient {
    #[instrument(skip_all, fields(date = %date))]
    async fn day_times(&self, date: NaiveDate) -> Result<RawDayTimes> {
        self.limiter.lock().await.wait().await;

        let query = [
            ("format", String::from("json")),
            ("key", self.api_key.clone()),
            ("24hours", String::from("true")),
            ("date", date.format("%Y-%m-%d").to_string()),
        ];

        tracing::debug!(base_url = %self.base_url, "prayer times API request");

        // The key travels in the query string, so the URL is stripped from
        // transport errors before they are reported.
        let response = self
            .http_client
            .get(self.base_url.clone())
            .query(&query)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("request failed for {date}"))?;

        let status = response.status();
        tracing::trace!(%status, "response received");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            bail!("prayer times API rejected the API key (HTTP {status}) for {date}");
        }

        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to read response body for {date}"))?;

        if !status.is_success() {
            bail!(
                "prayer times API error (HTTP {status}) for {date}: {}",
                preview(&body)
            );
        }

        let raw = Self::parse_day_response(&body, date)?;
        tracing::debug!(fields = raw.len(), "prayer times decoded");
        Ok(raw)
    }
}
