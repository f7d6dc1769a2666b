//! Alpaca market data adapter

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use common::{NewsItem, PriceBar};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::map_transport;
use crate::error::{MarketDataError, Result};
use crate::snapshot::MarketDataClient;

const KEY_HEADER: &str = "APCA-API-KEY-ID";
const SECRET_HEADER: &str = "APCA-API-SECRET-KEY";

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: DateTime<Utc>,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
    #[serde(default)]
    n: Option<u64>,
    #[serde(default)]
    vw: Option<f64>,
}

impl From<AlpacaBar> for PriceBar {
    fn from(bar: AlpacaBar) -> Self {
        PriceBar {
            open: bar.o,
            high: bar.h,
            low: bar.l,
            close: bar.c,
            volume: bar.v.max(0.0) as u64,
            timestamp: bar.t,
            trade_count: bar.n,
            vwap: bar.vw,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestBarResponse {
    bar: Option<AlpacaBar>,
}

#[derive(Debug, Deserialize)]
struct BarsResponse {
    #[serde(default)]
    bars: Option<Vec<AlpacaBar>>,
}

#[derive(Debug, Deserialize)]
struct AlpacaNewsItem {
    headline: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    symbols: Vec<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<AlpacaNewsItem> for NewsItem {
    fn from(item: AlpacaNewsItem) -> Self {
        NewsItem {
            headline: item.headline,
            summary: item.summary.filter(|s| !s.trim().is_empty()),
            source: item.source,
            url: item.url,
            symbols: item.symbols,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<AlpacaNewsItem>,
}

/// Alpaca data API client
///
/// Without credentials every call fails with
/// [`MarketDataError::MissingCredentials`], which snapshot assembly
/// degrades to an empty snapshot.
pub struct AlpacaClient {
    client: Client,
    base_url: String,
    news_url: String,
    credentials: Option<(String, String)>,
    lookback_days: i64,
}

impl AlpacaClient {
    pub fn from_config(config: &config::MarketDataConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| MarketDataError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            news_url: config.news_url.trim_end_matches('/').to_string(),
            credentials: config
                .credentials()
                .map(|(key, secret)| (key.to_string(), secret.to_string())),
            lookback_days: i64::from(config.previous_close_lookback_days),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let (key, secret) = self
            .credentials
            .as_ref()
            .ok_or(MarketDataError::MissingCredentials("market data"))?;
        Ok(request.header(KEY_HEADER, key).header(SECRET_HEADER, secret))
    }

    /// `[yesterday - lookback, yesterday]` as ISO dates
    fn previous_close_range(&self, today: NaiveDate) -> (String, String) {
        let end = today - Duration::days(1);
        let start = end - Duration::days(self.lookback_days);
        (start.format("%Y-%m-%d").to_string(), end.format("%Y-%m-%d").to_string())
    }
}

async fn error_status(response: reqwest::Response) -> MarketDataError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    MarketDataError::Status { status, body }
}

#[async_trait]
impl MarketDataClient for AlpacaClient {
    #[instrument(skip(self))]
    async fn latest_bar(&self, symbol: &str) -> Result<Option<PriceBar>> {
        let url = format!("{}/v2/stocks/{}/bars/latest", self.base_url, symbol);
        let response = self
            .authorized(self.client.get(&url))?
            .send()
            .await
            .map_err(map_transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No latest bar");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_status(response).await);
        }

        let body: LatestBarResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::Decode(e.to_string()))?;
        Ok(body.bar.map(PriceBar::from))
    }

    #[instrument(skip(self))]
    async fn previous_close(&self, symbol: &str) -> Result<Option<f64>> {
        let (start, end) = self.previous_close_range(Utc::now().date_naive());
        let url = format!("{}/v2/stocks/{}/bars", self.base_url, symbol);
        let response = self
            .authorized(self.client.get(&url))?
            .query(&[
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("timeframe", "1Day"),
                ("limit", "1"),
                ("sort", "desc"),
            ])
            .send()
            .await
            .map_err(map_transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_status(response).await);
        }

        let body: BarsResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::Decode(e.to_string()))?;
        Ok(body
            .bars
            .and_then(|bars| bars.into_iter().next())
            .map(|bar| bar.c))
    }

    #[instrument(skip(self))]
    async fn news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsItem>> {
        let limit = limit.to_string();
        let response = self
            .authorized(self.client.get(&self.news_url))?
            .query(&[("symbols", symbol), ("limit", limit.as_str()), ("sort", "desc")])
            .send()
            .await
            .map_err(map_transport)?;

        if !response.status().is_success() {
            return Err(error_status(response).await);
        }

        let body: NewsResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::Decode(e.to_string()))?;
        Ok(body.news.into_iter().map(NewsItem::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn client(config: &config::MarketDataConfig) -> AlpacaClient {
        AlpacaClient::from_config(config).unwrap()
    }

    #[test]
    fn test_bar_conversion() {
        let json = r#"{"bar":{"t":"2026-03-13T20:00:00Z","o":170.1,"h":172.5,"l":169.8,"c":171.9,"v":1523400,"n":12034,"vw":171.2}}"#;
        let body: LatestBarResponse = serde_json::from_str(json).unwrap();
        let bar = PriceBar::from(body.bar.unwrap());

        assert_eq!(bar.volume, 1_523_400);
        assert_eq!(bar.trade_count, Some(12034));
        assert_eq!(bar.close, 171.9);
    }

    #[test]
    fn test_news_conversion_drops_blank_summary() {
        let json = r#"{"news":[{"headline":"Apple unveils chip","summary":"  ","source":"benzinga","symbols":["AAPL"],"created_at":"2026-03-13T12:00:00Z"}]}"#;
        let body: NewsResponse = serde_json::from_str(json).unwrap();
        let item = NewsItem::from(body.news.into_iter().next().unwrap());

        assert_eq!(item.summary, None);
        assert_eq!(item.symbols, vec!["AAPL"]);
    }

    #[test]
    fn test_previous_close_range_ends_yesterday() {
        let alpaca = client(&config::MarketDataConfig::default());
        let today = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();

        assert_eq!(
            alpaca.previous_close_range(today),
            ("2026-03-10".to_string(), "2026-03-15".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let alpaca = client(&config::MarketDataConfig::default());

        assert_matches!(
            alpaca.latest_bar("AAPL").await,
            Err(MarketDataError::MissingCredentials(_))
        );
    }
}
