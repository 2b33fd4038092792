//! Open-Meteo archive API client.
//!
//! Loads multi-decade hourly temperature history for a site and reduces
//! it to one daily-high observation per calendar date, which is what the
//! climatology model trains on.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::config::{HistoryConfig, LocationConfig};
use common::{Error, Observation, Result};
use serde::Deserialize;
use tracing::{debug, info};

const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Archive API client with connection pooling and a request timeout.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: reqwest::Client,
}

// ── Archive response types ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: HourlySeries,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    /// Local timestamps, "YYYY-MM-DDTHH:MM".
    time: Vec<String>,
    /// Hourly readings; null where the archive has a gap.
    temperature_2m: Vec<Option<f64>>,
}

// ── Implementation ────────────────────────────────────────────────────

impl ArchiveClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("climo-bot/0.1")
            .pool_max_idle_per_host(2)
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("failed to build archive HTTP client");

        Self { client }
    }

    /// Fetch the site's hourly history and reduce it to daily highs.
    ///
    /// Requests Fahrenheit explicitly: Kalshi temperature contracts are
    /// printed in °F, so the model must train in the same unit.
    pub async fn fetch_daily_highs(
        &self,
        location: &LocationConfig,
        history: &HistoryConfig,
    ) -> Result<Vec<Observation>> {
        debug!(
            "Fetching archive for {} ({} → {})",
            location.name, history.start_date, history.end_date
        );

        let resp = self
            .client
            .get(ARCHIVE_URL)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("start_date", history.start_date.to_string()),
                ("end_date", history.end_date.to_string()),
                ("hourly", "temperature_2m".to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("timezone", location.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(format!("archive request for {}: {}", location.name, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Archive(format!(
                "archive returned {} for {}: {}",
                status,
                location.name,
                &body[..body.len().min(500)]
            )));
        }

        let data: ArchiveResponse = resp
            .json()
            .await
            .map_err(|e| Error::Archive(format!("JSON parse error for {}: {}", location.name, e)))?;

        let observations = daily_highs(&data.hourly.time, &data.hourly.temperature_2m);
        if observations.is_empty() {
            return Err(Error::Archive(format!(
                "archive returned no usable readings for {}",
                location.name
            )));
        }

        info!(
            "Loaded {} days of history for {}",
            observations.len(),
            location.name
        );
        Ok(observations)
    }
}

impl Default for ArchiveClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce hourly readings to one max-temperature observation per date.
///
/// Null readings and unparseable timestamps are dropped; output is
/// ordered by date with exactly one entry per date.
fn daily_highs(times: &[String], temps: &[Option<f64>]) -> Vec<Observation> {
    let mut highs: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for (ts, temp) in times.iter().zip(temps) {
        let Some(t) = temp else { continue };
        if !t.is_finite() {
            continue;
        }
        let Some(date_part) = ts.get(..10) else { continue };
        let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };

        highs
            .entry(date)
            .and_modify(|h| *h = h.max(*t))
            .or_insert(*t);
    }

    highs
        .into_iter()
        .map(|(date, high_temp)| Observation { date, high_temp })
        .collect()
}
