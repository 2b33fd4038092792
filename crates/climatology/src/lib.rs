//! Day-of-year climatology for daily high temperatures.
//!
//! Turns a multi-decade observation series into per-day-of-year Normal
//! distributions and answers probability and percentile queries for any
//! calendar date.

pub mod model;
pub mod normal;

pub use model::{ClimatologyModel, DayStat, DEFAULT_PERCENTILES};
pub use normal::{normal_cdf, normal_quantile};
