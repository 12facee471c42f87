//! Application configuration module.
//!
//! Manages the TOML config file holding API connection settings,
//! the optional API key and the output directory.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, AppConfig};
