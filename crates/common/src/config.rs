//! Bot configuration types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Observation site and matching Kalshi series.
    #[serde(default)]
    pub location: LocationConfig,

    /// Historical training window.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Climatology model parameters.
    #[serde(default)]
    pub model: ModelConfig,

    /// Market scan filters.
    #[serde(default)]
    pub scan: ScanConfig,
}

/// The site whose daily highs settle the contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Human-readable name.
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// IANA timezone used to bucket hourly readings into local days.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Kalshi series ticker for this site's high-temperature markets.
    #[serde(default = "default_series_ticker")]
    pub series_ticker: String,
}

/// Date range of archived observations to train on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_start")]
    pub start_date: NaiveDate,
    #[serde(default = "default_history_end")]
    pub end_date: NaiveDate,
}

/// Climatology training parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Days on each side of a day-of-year pooled into its statistics,
    /// wrapped circularly across the year boundary.
    #[serde(default = "default_window")]
    pub window: u16,

    /// Minimum pooled observations for a day-of-year to enter the model.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Continuity correction in °F applied to ≥/≤ queries, approximating
    /// the discreteness of reported temperatures under a continuous fit.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

/// Market scan filters and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Minimum edge (model probability − market price) to report.
    #[serde(default = "default_min_edge")]
    pub min_edge: f64,

    /// Minimum traded volume to consider a contract at all.
    #[serde(default = "default_min_volume")]
    pub min_volume: i64,

    /// Cap on reported opportunities.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Market status filter passed to the exchange ("open", "closed", ...).
    #[serde(default = "default_status")]
    pub status: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_location_name() -> String {
    "NYC Central Park".into()
}
fn default_latitude() -> f64 {
    40.78
}
fn default_longitude() -> f64 {
    -73.96
}
fn default_timezone() -> String {
    "America/New_York".into()
}
fn default_series_ticker() -> String {
    "KXHIGHNY".into()
}

fn default_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1995, 1, 1).expect("valid date literal")
}
fn default_history_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date literal")
}

fn default_window() -> u16 {
    7
}
fn default_min_samples() -> usize {
    30
}
fn default_epsilon() -> f64 {
    0.01
}

fn default_min_edge() -> f64 {
    0.05
}
fn default_min_volume() -> i64 {
    0
}
fn default_max_results() -> usize {
    20
}
fn default_status() -> String {
    "open".into()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
            series_ticker: default_series_ticker(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            start_date: default_history_start(),
            end_date: default_history_end(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            min_samples: default_min_samples(),
            epsilon: default_epsilon(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_edge: default_min_edge(),
            min_volume: default_min_volume(),
            max_results: default_max_results(),
            status: default_status(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            history: HistoryConfig::default(),
            model: ModelConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}
