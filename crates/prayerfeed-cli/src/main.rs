//! prayerfeed - London prayer-time feed generator.

/// Application configuration (TOML).
mod config;
/// Tracing subscriber setup.
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use prayerfeed_api::london::PrayerTimesClient;
use prayerfeed_feed::{
    DateWindow, calendar_year, london_now, london_today, ramadan, rolling_week, run_feed,
};
use tracing::instrument;

use crate::config::{API_KEY_ENV, AppConfig};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// API key (overrides `api.key` in config.toml).
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Fall back to the built-in local testing key when no key is configured.
    #[arg(long, global = true)]
    use_default_key: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate the 7-day rolling feed.
    Week(WeekArgs),
    /// Generate the full calendar-year feed.
    Year(YearArgs),
    /// Generate the Ramadan feed.
    Ramadan(YearArgs),
    /// Manage the configuration file.
    Config(ConfigCommand),
}

/// Arguments for the `week` subcommand.
#[derive(clap::Args)]
struct WeekArgs {
    /// First day of the window (default: today in Europe/London). Format: "2024-03-11".
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Output file (default: `{output.dir}/london-prayer-times-7d.json`).
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Arguments for the `year` and `ramadan` subcommands.
#[derive(clap::Args)]
struct YearArgs {
    /// Gregorian year (default: current year in Europe/London).
    #[arg(long)]
    year: Option<i32>,

    /// Output file (default: the feed's file name under `output.dir`).
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config.toml with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path.
    Path,
}

/// Builds the API client from config and the resolved key.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_client(config: &AppConfig, api_key: String) -> Result<PrayerTimesClient> {
    PrayerTimesClient::builder()
        .base_url(config.api.base_url()?)
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.api.timeout())
        .min_interval(config.api.min_interval())
        .build()
        .context("failed to build prayer times API client")
}

/// Generates one feed and writes it to `output`.
///
/// # Errors
///
/// Returns an error if the key is missing, any request fails, a response
/// is incomplete, or the file cannot be written.
#[instrument(skip_all)]
async fn run_generate(
    cli: &Cli,
    config: &AppConfig,
    window: &DateWindow,
    output: &Path,
) -> Result<()> {
    let kind = window.kind();
    let (Some(first), Some(last)) = (window.dates().first(), window.dates().last()) else {
        anyhow::bail!("{kind} window is empty");
    };
    tracing::info!("Generating {kind} feed: {first} .. {last} ({} days)", window.len());

    let api_key = config.resolve_api_key(cli.api_key.as_deref(), cli.use_default_key)?;
    let client = build_client(config, api_key)?;

    run_feed(&client, window, &london_now(), output)
        .await
        .with_context(|| format!("failed to generate {kind} feed"))?;
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
fn run_config_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    AppConfig::default()
        .save(config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote {}", config_path.display());
    Ok(())
}

/// Runs a `config` subcommand.
///
/// # Errors
///
/// Returns an error if `config init` fails.
fn run_config(config_path: &Path, command: &ConfigSubcommands) -> Result<()> {
    match *command {
        ConfigSubcommands::Init { force } => run_config_init(config_path, force),
        ConfigSubcommands::Path => {
            tracing::info!("{}", config_path.display());
            Ok(())
        }
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config_path =
        AppConfig::resolve_path(cli.dir.as_deref()).context("failed to resolve config path")?;

    let (window, output) = match &cli.command {
        Commands::Config(cmd) => return run_config(&config_path, &cmd.command),
        Commands::Week(args) => (
            rolling_week(args.today.unwrap_or_else(london_today))?,
            args.output.as_ref(),
        ),
        Commands::Year(args) => (
            calendar_year(args.year.unwrap_or_else(|| london_today().year()))?,
            args.output.as_ref(),
        ),
        Commands::Ramadan(args) => (
            ramadan(args.year.unwrap_or_else(|| london_today().year()))?,
            args.output.as_ref(),
        ),
    };

    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let output = output
        .cloned()
        .unwrap_or_else(|| config.output.path_for(window.kind()));

    run_generate(&cli, &config, &window, &output).await
}
