//! The day-of-year climatology model.
//!
//! Training pools observations whose day-of-year falls within a window of
//! the target day, measured on a circular ring so late-December and
//! early-January days share neighbors across the year boundary. Each
//! qualifying day gets an independent Normal(mean, std) fit; thin days
//! are omitted and resolved at query time by searching outward along the
//! ring for the nearest fitted day.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use common::config::ModelConfig;
use common::{Error, Observation, Result};
use tracing::info;

use crate::normal::{normal_cdf, normal_quantile};

/// Highest day-of-year value (leap-year Dec 31).
const MAX_DOY: u16 = 366;

/// Modulus of the day-of-year ring. Day 366 coincides with day 1, so a
/// window around day 2 reaches back to day 360 the way it would in a
/// non-leap year.
const RING_DAYS: u16 = 365;

/// Ring-search cap: half a year of offsets, after which the search fails
/// deterministically instead of looping.
const MAX_RING_OFFSET: u16 = 182;

/// Percentile levels reported when the caller has no preference.
pub const DEFAULT_PERCENTILES: [u8; 7] = [5, 10, 25, 50, 75, 90, 95];

/// Fitted statistics for one day-of-year.
#[derive(Debug, Clone, Copy)]
pub struct DayStat {
    pub day_of_year: u16,
    pub mean: f64,
    pub std_dev: f64,
    pub samples: usize,
}

/// Immutable mapping from day-of-year to fitted Normal parameters.
///
/// Built once by [`ClimatologyModel::train`] and read-only afterwards, so
/// it is safe to share across threads without locking.
#[derive(Debug, Clone)]
pub struct ClimatologyModel {
    stats: BTreeMap<u16, DayStat>,
    epsilon: f64,
}

/// Circular distance between two day-of-year values.
fn ring_distance(a: u16, b: u16) -> u16 {
    let d = a.abs_diff(b) % RING_DAYS;
    d.min(RING_DAYS - d)
}

/// Wrap an offset day-of-year back onto the 1..=365 ring.
fn wrap_doy(d: i32) -> u16 {
    ((d - 1).rem_euclid(i32::from(RING_DAYS)) + 1) as u16
}

impl ClimatologyModel {
    /// Fit the model from a historical observation series.
    ///
    /// Fails with `InsufficientData` when no day-of-year accumulates
    /// `min_samples` observations; an empty model answers nothing.
    pub fn train(observations: &[Observation], cfg: &ModelConfig) -> Result<Self> {
        let mut by_doy: Vec<Vec<f64>> = vec![Vec::new(); usize::from(MAX_DOY) + 1];
        let mut used = 0usize;
        for obs in observations {
            if obs.high_temp.is_finite() {
                by_doy[obs.date.ordinal() as usize].push(obs.high_temp);
                used += 1;
            }
        }

        let mut stats = BTreeMap::new();
        for doy in 1..=MAX_DOY {
            let mut temps: Vec<f64> = Vec::new();
            for other in 1..=MAX_DOY {
                if ring_distance(doy, other) <= cfg.window {
                    temps.extend_from_slice(&by_doy[usize::from(other)]);
                }
            }

            let n = temps.len();
            if n < cfg.min_samples {
                continue;
            }

            let mean = temps.iter().sum::<f64>() / n as f64;
            // Unbiased (n−1) sample standard deviation.
            let std_dev = if n > 1 {
                let var = temps.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
                var.sqrt()
            } else {
                0.0
            };

            stats.insert(
                doy,
                DayStat {
                    day_of_year: doy,
                    mean,
                    std_dev,
                    samples: n,
                },
            );
        }

        if stats.is_empty() {
            return Err(Error::InsufficientData {
                min_samples: cfg.min_samples,
            });
        }

        info!(
            "Trained climatology: {}/366 day-of-year slots from {} observations (window=±{}d)",
            stats.len(),
            used,
            cfg.window
        );

        Ok(Self {
            stats,
            epsilon: cfg.epsilon,
        })
    }

    /// Number of fitted day-of-year slots.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Continuity-correction constant used by the ≥/≤ queries.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Fitted parameters for a date, falling back to the nearest fitted
    /// day-of-year along the ring when the date's own day is missing.
    fn params_for(&self, date: NaiveDate) -> Result<&DayStat> {
        let doy = date.ordinal() as u16;
        if let Some(stat) = self.stats.get(&doy) {
            return Ok(stat);
        }

        for offset in 1..=MAX_RING_OFFSET {
            for candidate in [
                wrap_doy(i32::from(doy) - i32::from(offset)),
                wrap_doy(i32::from(doy) + i32::from(offset)),
            ] {
                if let Some(stat) = self.stats.get(&candidate) {
                    return Ok(stat);
                }
            }
        }

        Err(Error::DateUnresolvable(date))
    }

    /// (mean, std) of the fitted distribution for a date.
    pub fn forecast(&self, date: NaiveDate) -> Result<(f64, f64)> {
        let stat = self.params_for(date)?;
        Ok((stat.mean, stat.std_dev))
    }

    /// Temperature values at the given percentile levels (integer
    /// percents, interior to 0..100).
    pub fn percentiles(&self, date: NaiveDate, levels: &[u8]) -> Result<BTreeMap<u8, f64>> {
        let stat = self.params_for(date)?;
        let mut out = BTreeMap::new();
        for &level in levels {
            let value = if stat.std_dev <= 0.0 {
                stat.mean
            } else {
                stat.mean + stat.std_dev * normal_quantile(f64::from(level) / 100.0)
            };
            out.insert(level, value);
        }
        Ok(out)
    }

    // ── Probability queries ───────────────────────────────────────────

    /// P(T > x) for the date's fitted distribution.
    pub fn prob_greater_than(&self, x: f64, date: NaiveDate) -> Result<f64> {
        let stat = self.params_for(date)?;
        if stat.std_dev <= 0.0 {
            // Point mass at the mean.
            return Ok(if stat.mean > x { 1.0 } else { 0.0 });
        }
        Ok(1.0 - normal_cdf((x - stat.mean) / stat.std_dev))
    }

    /// P(T < x) for the date's fitted distribution.
    pub fn prob_less_than(&self, x: f64, date: NaiveDate) -> Result<f64> {
        let stat = self.params_for(date)?;
        if stat.std_dev <= 0.0 {
            return Ok(if stat.mean < x { 1.0 } else { 0.0 });
        }
        Ok(normal_cdf((x - stat.mean) / stat.std_dev))
    }

    /// P(T ≥ x), via P(T > x − ε). The ε shift approximates the
    /// discreteness of reported temperatures under the continuous fit.
    pub fn prob_greater_equal(&self, x: f64, date: NaiveDate) -> Result<f64> {
        self.prob_greater_than(x - self.epsilon, date)
    }

    /// P(T ≤ x), via P(T < x + ε).
    pub fn prob_less_equal(&self, x: f64, date: NaiveDate) -> Result<f64> {
        self.prob_less_than(x + self.epsilon, date)
    }

    /// Probability that T falls between `low` and `high`, half-open
    /// [low, high) by default; inclusivity on each bound is toggled with
    /// the same ε shift as the one-sided queries.
    pub fn prob_range(
        &self,
        low: f64,
        high: f64,
        date: NaiveDate,
        inclusive_low: bool,
        inclusive_high: bool,
    ) -> Result<f64> {
        let stat = self.params_for(date)?;

        let mut lo = low;
        let mut hi = high;
        if !inclusive_low {
            lo += self.epsilon;
        }
        if inclusive_high {
            hi += self.epsilon;
        }

        if stat.std_dev <= 0.0 {
            return Ok(if stat.mean >= lo && stat.mean < hi {
                1.0
            } else {
                0.0
            });
        }

        let p = normal_cdf((hi - stat.mean) / stat.std_dev)
            - normal_cdf((lo - stat.mean) / stat.std_dev);
        Ok(p.max(0.0))
    }

    /// Probability of landing within ±`tolerance` of `x`, both bounds
    /// inclusive. Useful for bucketed range contracts.
    pub fn prob_exactly(&self, x: f64, date: NaiveDate, tolerance: f64) -> Result<f64> {
        self.prob_range(x - tolerance, x + tolerance, date, true, true)
    }
}
