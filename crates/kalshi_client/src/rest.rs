//! REST client for the Kalshi market-data API.
//!
//! Only the public read endpoints are covered; market listings and
//! single-market lookups need no authentication.

use common::{Error, MarketInfo, MarketResponse, MarketsResponse, Result};
use tracing::debug;

const PROD_BASE_URL: &str = "https://api.elections.kalshi.com";

/// Async REST client for Kalshi market data.
#[derive(Debug, Clone)]
pub struct KalshiRestClient {
    client: reqwest::Client,
    base_url: String,
}

impl KalshiRestClient {
    pub fn new() -> Self {
        Self::with_base_url(PROD_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("climo-bot/0.1")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self { client, base_url }
    }

    /// URL helper.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch markets for a series, following pagination cursors until the
    /// listing is exhausted.
    pub async fn get_markets(
        &self,
        series_ticker: Option<&str>,
        status: Option<&str>,
        limit: u32,
    ) -> Result<Vec<MarketInfo>> {
        let mut all_markets = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let path = "/trade-api/v2/markets";
            let mut req = self.client.get(self.url(path));

            if let Some(st) = series_ticker {
                req = req.query(&[("series_ticker", st)]);
            }
            if let Some(s) = status {
                req = req.query(&[("status", s)]);
            }
            req = req.query(&[("limit", &limit.to_string())]);
            if let Some(ref c) = cursor {
                req = req.query(&[("cursor", c.as_str())]);
            }

            let resp = req.send().await.map_err(|e| Error::Http(e.to_string()))?;

            let status_code = resp.status().as_u16();
            if status_code != 200 {
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::KalshiApi {
                    status: status_code,
                    message: body,
                });
            }

            let body: MarketsResponse = resp.json().await.map_err(|e| Error::Http(e.to_string()))?;

            let count = body.markets.len();
            all_markets.extend(body.markets);

            debug!("Fetched {} markets (total: {})", count, all_markets.len());

            match body.cursor {
                Some(c) if !c.is_empty() => cursor = Some(c),
                _ => break,
            }
        }

        Ok(all_markets)
    }

    /// Fetch a single market by ticker.
    pub async fn get_market(&self, ticker: &str) -> Result<MarketInfo> {
        let path = format!("/trade-api/v2/markets/{}", ticker);
        let resp = self
            .client
            .get(self.url(&path))
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status_code = resp.status().as_u16();
        if status_code != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::KalshiApi {
                status: status_code,
                message: body,
            });
        }

        let body: MarketResponse = resp.json().await.map_err(|e| Error::Http(e.to_string()))?;
        Ok(body.market)
    }
}

impl Default for KalshiRestClient {
    fn default() -> Self {
        Self::new()
    }
}
