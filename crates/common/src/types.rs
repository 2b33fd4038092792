//! Domain types shared across climo-bot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ── Historical observations ───────────────────────────────────────────

/// One daily-high temperature observation.
///
/// The series provider guarantees at most one observation per calendar
/// date and a finite temperature (nulls are dropped during aggregation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// Daily maximum temperature in °F.
    pub high_temp: f64,
}

// ── Kalshi market types ───────────────────────────────────────────────

/// A Kalshi market as returned by GET /trade-api/v2/markets.
///
/// Prices are integer cents; the exchange reports 0 for an empty book
/// side, which the parser treats the same as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInfo {
    pub ticker: String,
    #[serde(default)]
    pub event_ticker: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub yes_bid: Option<i64>,
    #[serde(default)]
    pub yes_ask: Option<i64>,
    #[serde(default)]
    pub no_bid: Option<i64>,
    #[serde(default)]
    pub no_ask: Option<i64>,
    #[serde(default)]
    pub volume: i64,
    #[serde(default)]
    pub open_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
}

/// Paginated response from GET /trade-api/v2/markets.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsResponse {
    pub markets: Vec<MarketInfo>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Response from GET /trade-api/v2/markets/{ticker}.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketResponse {
    pub market: MarketInfo,
}

// ── Parsed contracts ──────────────────────────────────────────────────

/// What a contract's title says about its settlement condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    GreaterThan,
    LessThan,
    Range,
    Unknown,
}

/// A structured contract extracted from one raw market record.
///
/// Prices are normalized to [0, 1] before this type reaches the engine;
/// `yes_mid` is the bid/ask average, or whichever side is quoted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub ticker: String,
    pub title: String,
    pub event_ticker: String,
    pub yes_bid: Option<f64>,
    pub yes_ask: Option<f64>,
    pub yes_mid: Option<f64>,
    pub volume: i64,
    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
    pub status: String,
    /// Settlement threshold in °F (lower bound for range contracts).
    pub threshold: Option<f64>,
    /// Upper bound in °F when the title prints a full range.
    pub threshold_high: Option<f64>,
    pub target_date: Option<NaiveDate>,
    pub contract_type: ContractType,
}

// ── Analysis results ──────────────────────────────────────────────────

/// Why a contract could not be priced against the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No target date could be extracted from the title.
    MissingDate,
    /// No temperature threshold could be extracted from the title.
    MissingThreshold,
    /// The model has no climatology anywhere near the target date.
    UnresolvableDate,
    /// The probability computation produced a non-finite value.
    BadNumerics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Complete,
    CannotEvaluate(SkipReason),
}

/// Per-contract mispricing analysis.
///
/// A pure function of (model, contract); fields are `None` when the
/// inputs they need are unavailable. A missing field is a normal
/// outcome, not an error; see `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub contract: Contract,
    pub model_probability: Option<f64>,
    pub market_price: Option<f64>,
    pub edge: Option<f64>,
    pub expected_value: Option<f64>,
    pub kelly_fraction: Option<f64>,
    pub status: AnalysisStatus,
}

impl Analysis {
    pub fn is_complete(&self) -> bool {
        self.status == AnalysisStatus::Complete
    }
}
