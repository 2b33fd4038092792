//! Per-contract mispricing analysis.
//!
//! Every contract gets an [`Analysis`]: pricing failures are recorded
//! in its status, never raised, so one unparseable contract cannot abort
//! a batch.

use climatology::ClimatologyModel;
use common::{Analysis, AnalysisStatus, Contract, ContractType, SkipReason};
use tracing::warn;

/// Prices contracts against a trained (read-only) climatology model.
pub struct MispricingAnalyzer<'a> {
    model: &'a ClimatologyModel,
}

impl<'a> MispricingAnalyzer<'a> {
    pub fn new(model: &'a ClimatologyModel) -> Self {
        Self { model }
    }

    /// Model probability of the contract settling YES.
    ///
    /// Needs a resolved target date and threshold; range contracts use
    /// both bounds when the title printed them (inclusive on each, the
    /// way Kalshi ranges settle), and degrade to the ≥-threshold query
    /// otherwise, as do `Unknown` types.
    pub fn model_probability(&self, contract: &Contract) -> Result<f64, SkipReason> {
        let date = contract.target_date.ok_or(SkipReason::MissingDate)?;
        let threshold = contract.threshold.ok_or(SkipReason::MissingThreshold)?;

        let result = match contract.contract_type {
            ContractType::GreaterThan | ContractType::Unknown => {
                self.model.prob_greater_equal(threshold, date)
            }
            ContractType::LessThan => self.model.prob_less_equal(threshold, date),
            ContractType::Range => match contract.threshold_high {
                Some(high) => self.model.prob_range(threshold, high, date, true, true),
                None => self.model.prob_greater_equal(threshold, date),
            },
        };

        match result {
            Ok(p) if p.is_finite() => Ok(p),
            Ok(p) => {
                warn!("{}: non-finite probability {} — skipping", contract.ticker, p);
                Err(SkipReason::BadNumerics)
            }
            Err(e) => {
                warn!("{}: {} — skipping", contract.ticker, e);
                Err(SkipReason::UnresolvableDate)
            }
        }
    }

    /// Full analysis of one contract. Total: never errors.
    pub fn analyze(&self, contract: &Contract) -> Analysis {
        let market_price = contract.yes_mid;

        match self.model_probability(contract) {
            Err(reason) => Analysis {
                contract: contract.clone(),
                model_probability: None,
                market_price,
                edge: None,
                expected_value: None,
                kelly_fraction: None,
                status: AnalysisStatus::CannotEvaluate(reason),
            },
            Ok(p) => Analysis {
                contract: contract.clone(),
                model_probability: Some(p),
                market_price,
                edge: market_price.map(|m| edge(p, m)),
                expected_value: market_price.map(|m| expected_value(p, m)),
                kelly_fraction: market_price.and_then(|m| kelly_fraction(p, m)),
                status: AnalysisStatus::Complete,
            },
        }
    }
}

/// Edge of the model over the market.
pub fn edge(model_prob: f64, market_price: f64) -> f64 {
    model_prob - market_price
}

/// Expected value of a unit-payout YES share bought at `market_price`.
/// Numerically identical to [`edge`]; both are exposed for interface
/// compatibility.
pub fn expected_value(model_prob: f64, market_price: f64) -> f64 {
    model_prob - market_price
}

/// Kelly-optimal bankroll fraction for a YES share at `market_price`.
///
/// Defined only for interior prices and probabilities (the boundary
/// cases would divide by zero), and only when the bet is favorable:
/// a non-positive fraction is "no stake", not a recommendation.
pub fn kelly_fraction(model_prob: f64, market_price: f64) -> Option<f64> {
    if market_price <= 0.0 || market_price >= 1.0 {
        return None;
    }
    if model_prob <= 0.0 || model_prob >= 1.0 {
        return None;
    }

    // f = (b·p − q) / b with decimal odds b = 1/price − 1.
    let b = 1.0 / market_price - 1.0;
    let f = (b * model_prob - (1.0 - model_prob)) / b;

    (f > 0.0).then_some(f)
}
