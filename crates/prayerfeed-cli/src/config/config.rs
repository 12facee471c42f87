//! `AppConfig` struct and TOML read/write.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use prayerfeed_api::london::DEFAULT_BASE_URL;
use prayerfeed_feed::FeedKind;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "LONDON_PRAYER_TIMES_API_KEY";

/// Key used only when `--use-default-key` is passed, for runs against a
/// local mock server.
const LOCAL_TEST_API_KEY: &str = "local-testing-key";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Directory name under the XDG config home.
const APP_DIR: &str = "prayerfeed";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Upstream API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Upstream API configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the `times` endpoint.
    pub base_url: String,
    /// API key. Overridden by `--api-key` and the environment.
    pub key: Option<String>,
    /// Minimum interval between requests, in milliseconds.
    pub min_interval_ms: u64,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            key: None,
            min_interval_ms: 100,
            timeout_secs: 20,
        }
    }
}

impl ApiConfig {
    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("invalid api.base_url: {}", self.base_url))
    }

    /// Minimum interval between requests.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Output configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory feeds are written to when `--output` is not given.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

impl OutputConfig {
    /// Default output path for a feed.
    #[must_use]
    pub fn path_for(&self, kind: FeedKind) -> PathBuf {
        self.dir.join(kind.default_file_name())
    }
}

/// Picks the config path from an explicit directory or the environment.
fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir.join(CONFIG_FILE));
    }
    let config_home = xdg_config_home
        .filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(".config")))
        .context("cannot locate the config directory: set HOME or pass --dir")?;
    Ok(config_home.join(APP_DIR).join(CONFIG_FILE))
}

/// Returns the trimmed value if it is not blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Resolves the config file path.
    ///
    /// `{dir}/config.toml` when `dir` is given, otherwise
    /// `$XDG_CONFIG_HOME/prayerfeed/config.toml`, falling back to
    /// `$HOME/.config/prayerfeed/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is absent and neither variable is set.
    pub fn resolve_path(dir: Option<&Path>) -> Result<PathBuf> {
        config_path_from(
            dir,
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Resolves the API key.
    ///
    /// Precedence: `cli_key` (flag or environment) > `api.key` > the
    /// local testing key when `use_default_key` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is available.
    pub fn resolve_api_key(&self, cli_key: Option<&str>, use_default_key: bool) -> Result<String> {
        if let Some(key) = non_blank(cli_key).or_else(|| non_blank(self.api.key.as_deref())) {
            return Ok(String::from(key));
        }
        if use_default_key {
            tracing::warn!("Using the built-in local testing API key");
            return Ok(String::from(LOCAL_TEST_API_KEY));
        }
        bail!("no API key configured: set {API_KEY_ENV}, pass --api-key, or set api.key in config.toml")
    }
}
