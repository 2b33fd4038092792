//! Mispricing engine.
//!
//! Prices parsed contracts against a trained climatology model and ranks
//! the discrepancies.

pub mod analyzer;
pub mod rank;

pub use analyzer::{edge, expected_value, kelly_fraction, MispricingAnalyzer};
pub use rank::rank_opportunities;
