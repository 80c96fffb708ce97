#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Configuration for the disaster map.
//!
//! The default configuration lives in `config/default.toml` and is baked
//! into the binary via [`include_str!`]. A user-supplied file replaces it
//! wholesale, and a small set of environment variables override individual
//! values afterwards:
//!
//! * `DISASTER_MAP_API_URL`: base URL of the report service
//! * `DISASTER_MAP_CAROUSEL_INTERVAL_MS`: carousel autoplay interval

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "DISASTER_MAP_API_URL";

/// Environment variable overriding [`CarouselConfig::interval_ms`].
pub const CAROUSEL_INTERVAL_ENV: &str = "DISASTER_MAP_CAROUSEL_INTERVAL_MS";

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or is missing fields.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Complete application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Remote report service settings.
    pub api: ApiConfig,
    /// Map view settings.
    pub map: MapConfig,
    /// Report status conventions.
    pub report: ReportConfig,
    /// Create-form defaults and labels.
    pub form: FormConfig,
    /// Dashboard media carousel.
    pub carousel: CarouselConfig,
    /// Dashboard statistics and donation links.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Remote report service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Collection URL of the report service.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Map view settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    /// Initial view center latitude.
    pub center_latitude: f64,
    /// Initial view center longitude.
    pub center_longitude: f64,
    /// Initial zoom level.
    pub zoom: u8,
    /// Tile URL template.
    pub tile_url: String,
    /// Tile attribution text.
    pub attribution: String,
    /// Maximum zoom the tile layer supports.
    pub max_zoom: u8,
    /// Zoom level used when locating a single report.
    pub locate_zoom: u8,
    /// Duration of the animated fly-to, in seconds.
    pub fly_duration_secs: f64,
}

/// Report status conventions.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Status value highlighted as the current disaster.
    pub current_status: String,
    /// Status assumed for reports that carry none.
    pub fallback_status: String,
    /// Status values offered by the status filter and the form.
    #[serde(default)]
    pub statuses: Vec<String>,
}

/// Create-form defaults and labels.
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Form heading.
    pub title: String,
    /// Category preselected when the form opens.
    pub default_category: String,
    /// Status preselected when the form opens.
    pub default_status: String,
    /// Submit button label when idle.
    pub submit_label: String,
    /// Submit button label while a submission is in flight.
    pub busy_label: String,
}

/// Dashboard media carousel.
#[derive(Debug, Clone, Deserialize)]
pub struct CarouselConfig {
    /// Autoplay interval in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Slides in display order.
    #[serde(default)]
    pub slides: Vec<SlideConfig>,
}

impl CarouselConfig {
    /// Autoplay interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// A single carousel slide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlideConfig {
    /// Media path or URL.
    pub src: String,
    /// Caption shown under the slide.
    #[serde(default)]
    pub caption: String,
}

/// Dashboard statistics and donation links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    /// Victim statistics.
    #[serde(default)]
    pub stats: Vec<VictimStat>,
    /// Donation channels.
    #[serde(default)]
    pub donations: Vec<DonationLink>,
}

/// One victim statistic shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VictimStat {
    /// Statistic label.
    pub label: String,
    /// Statistic value.
    pub value: u64,
}

/// One donation channel shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DonationLink {
    /// Organisation name.
    pub name: String,
    /// Donation page URL.
    pub url: String,
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_interval_ms() -> u64 {
    5_000
}

impl AppConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not a valid config.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Returns the embedded default configuration, without environment
    /// overrides.
    ///
    /// # Panics
    ///
    /// Panics if the embedded default config is malformed (this is a
    /// compile-time guarantee since the file is embedded and tested).
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml(DEFAULT_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
    }

    /// Loads the configuration: `path` if given, otherwise the embedded
    /// default, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `path` cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(path)?)?
            }
            None => Self::embedded(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides from `lookup` (normally the process environment).
    ///
    /// Unparseable numeric overrides are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            log::debug!("{API_URL_ENV} overrides api.base_url");
            self.api.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(CAROUSEL_INTERVAL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.carousel.interval_ms = ms,
                _ => log::warn!("Ignoring invalid {CAROUSEL_INTERVAL_ENV} value: {raw:?}"),
            }
        }
    }
}
