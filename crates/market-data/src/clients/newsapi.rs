//! NewsAPI adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::WorldNewsItem;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::map_transport;
use crate::error::{MarketDataError, Result};
use crate::world::{NewsCategory, WorldNewsClient};

#[derive(Debug, Deserialize)]
struct Source {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: Source,
    title: Option<String>,
    description: Option<String>,
    url: String,
    url_to_image: Option<String>,
    published_at: Option<DateTime<Utc>>,
    content: Option<String>,
}

impl NewsApiArticle {
    fn into_item(self) -> Option<WorldNewsItem> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(WorldNewsItem {
            title,
            description: self.description,
            source: self.source.name,
            url: self.url,
            image_url: self.url_to_image,
            published_at: self.published_at,
            content: self.content,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

/// NewsAPI top-headlines client
///
/// The key is sent in the `X-Api-Key` header so it never appears in URLs.
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    country: String,
}

impl NewsApiClient {
    pub fn from_config(config: &config::WorldNewsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| MarketDataError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.key().map(str::to_string),
            country: config.country.clone(),
        })
    }
}

#[async_trait]
impl WorldNewsClient for NewsApiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self), fields(category = category.as_str()))]
    async fn top_headlines(&self, category: NewsCategory, page_size: u32) -> Result<Vec<WorldNewsItem>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MarketDataError::MissingCredentials("world news"))?;

        let page_size = page_size.to_string();
        let response = self
            .client
            .get(format!("{}/top-headlines", self.base_url))
            .header("X-Api-Key", api_key)
            .query(&[
                ("category", category.as_str()),
                ("country", self.country.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Status { status, body });
        }

        let body: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::Decode(e.to_string()))?;
        Ok(body
            .articles
            .into_iter()
            .filter_map(NewsApiArticle::into_item)
            .collect())
    }
}
