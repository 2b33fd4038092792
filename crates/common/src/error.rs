//! Unified error type for climo-bot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("insufficient data: no day-of-year reached {min_samples} samples")]
    InsufficientData { min_samples: usize },

    #[error("no climatology available anywhere near {0}")]
    DateUnresolvable(chrono::NaiveDate),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Kalshi API error (status={status}): {message}")]
    KalshiApi { status: u16, message: String },

    #[error("archive API error: {0}")]
    Archive(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
