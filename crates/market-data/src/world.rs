//! World news gathering

use async_trait::async_trait;
use common::WorldNewsItem;
use observability::metrics::record_upstream_failure;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::error::{MarketDataError, Result};

/// Markers of a developing story, matched case-insensitively in title or description
pub const BREAKING_KEYWORDS: [&str; 7] = [
    "breaking",
    "urgent",
    "developing",
    "just in",
    "alert",
    "exclusive",
    "update",
];

/// Page size of the wide general fetch that is filtered for breaking stories
const BREAKING_SCAN_SIZE: u32 = 20;

/// Items kept from the breaking scan when no headline matches a keyword
const BREAKING_FALLBACK_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsCategory {
    Business,
    General,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::General => "general",
        }
    }
}

/// Client trait for a general news provider
#[async_trait]
pub trait WorldNewsClient: Send + Sync {
    /// Whether the provider has the key it needs
    fn is_configured(&self) -> bool {
        true
    }

    async fn top_headlines(&self, category: NewsCategory, page_size: u32) -> Result<Vec<WorldNewsItem>>;
}

/// Keep items whose title or description carries a breaking keyword
///
/// Falls back to the first five items when nothing matches.
pub fn filter_breaking(items: Vec<WorldNewsItem>) -> Vec<WorldNewsItem> {
    let is_breaking = |item: &WorldNewsItem| {
        let title = item.title.to_lowercase();
        let description = item.description.as_deref().unwrap_or_default().to_lowercase();
        BREAKING_KEYWORDS
            .iter()
            .any(|k| title.contains(k) || description.contains(k))
    };

    if items.iter().any(is_breaking) {
        items.into_iter().filter(is_breaking).collect()
    } else {
        items.into_iter().take(BREAKING_FALLBACK_COUNT).collect()
    }
}

/// Gather breaking, business and general headlines into one deduplicated list
///
/// The three fetches run concurrently; a failed fetch contributes nothing.
/// Duplicates are dropped by exact title, keeping first-seen order, and the
/// result is capped at `max_items`.
pub async fn gather_world_news<C>(client: &C, page_size: u32, max_items: usize) -> Vec<WorldNewsItem>
where
    C: WorldNewsClient + ?Sized,
{
    let (breaking, business, general) = tokio::join!(
        client.top_headlines(NewsCategory::General, BREAKING_SCAN_SIZE),
        client.top_headlines(NewsCategory::Business, page_size),
        client.top_headlines(NewsCategory::General, page_size),
    );

    let breaking = breaking.map(filter_breaking);

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for (label, batch) in [("breaking", breaking), ("business", business), ("general", general)] {
        match batch {
            Ok(batch) => {
                for item in batch {
                    if seen.insert(item.title.clone()) {
                        items.push(item);
                    }
                }
            }
            Err(error) => {
                record_upstream_failure("world_news");
                warn!(category = label, %error, "World news fetch failed");
            }
        }
    }

    items.truncate(max_items);
    info!(count = items.len(), "World news gathered");
    items
}

// ==================== Static Implementation ====================

/// World news client serving fixed headlines per category
#[derive(Default)]
pub struct StaticWorldNewsClient {
    headlines: HashMap<NewsCategory, Vec<WorldNewsItem>>,
    failing: HashSet<NewsCategory>,
    unconfigured: bool,
    requests: Mutex<Vec<(NewsCategory, u32)>>,
}

impl StaticWorldNewsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headlines(mut self, category: NewsCategory, items: Vec<WorldNewsItem>) -> Self {
        self.headlines.insert(category, items);
        self
    }

    pub fn with_failure(mut self, category: NewsCategory) -> Self {
        self.failing.insert(category);
        self
    }

    /// Report the provider key as missing
    pub fn unconfigured(mut self) -> Self {
        self.unconfigured = true;
        self
    }

    /// Category and page size of every request served
    pub fn requests(&self) -> Vec<(NewsCategory, u32)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl WorldNewsClient for StaticWorldNewsClient {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn top_headlines(&self, category: NewsCategory, page_size: u32) -> Result<Vec<WorldNewsItem>> {
        self.requests.lock().push((category, page_size));
        if self.failing.contains(&category) {
            return Err(MarketDataError::Status {
                status: 500,
                body: format!("{} unavailable", category.as_str()),
            });
        }
        Ok(self
            .headlines
            .get(&category)
            .map(|items| items.iter().take(page_size as usize).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> WorldNewsItem {
        WorldNewsItem {
            title: title.to_string(),
            description: None,
            source: "Wire".to_string(),
            url: format!("https://news.example/{}", title.len()),
            image_url: None,
            published_at: None,
            content: None,
        }
    }

    #[test]
    fn test_filter_breaking_matches_keywords() {
        let mut described = item("Markets steady");
        described.description = Some("Developing story on rates".into());

        let filtered = filter_breaking(vec![
            item("BREAKING: Port strike begins"),
            item("Weekend recipes"),
            described,
        ]);

        let titles: Vec<_> = filtered.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["BREAKING: Port strike begins", "Markets steady"]);
    }

    #[test]
    fn test_filter_breaking_falls_back_to_first_five() {
        let items: Vec<_> = (0..8).map(|i| item(&format!("Quiet story {}", i))).collect();
        let filtered = filter_breaking(items);

        assert_eq!(filtered.len(), 5);
        assert_eq!(filtered[0].title, "Quiet story 0");
    }

    #[tokio::test]
    async fn test_gather_dedups_by_title_in_order() {
        let client = StaticWorldNewsClient::new()
            .with_headlines(
                NewsCategory::General,
                vec![item("Alert: storm nears coast"), item("Local election results")],
            )
            .with_headlines(
                NewsCategory::Business,
                vec![item("Oil climbs"), item("Alert: storm nears coast")],
            );

        let items = gather_world_news(&client, 5, 10).await;
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();

        assert_eq!(
            titles,
            vec!["Alert: storm nears coast", "Oil climbs", "Local election results"]
        );
        assert_eq!(client.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_gather_caps_and_survives_failed_category() {
        let general: Vec<_> = (0..20).map(|i| item(&format!("Update {}", i))).collect();
        let client = StaticWorldNewsClient::new()
            .with_headlines(NewsCategory::General, general)
            .with_failure(NewsCategory::Business);

        let items = gather_world_news(&client, 5, 10).await;
        assert_eq!(items.len(), 10);
    }

    #[test]
    fn test_category_query_values() {
        assert_eq!(NewsCategory::Business.as_str(), "business");
        assert_eq!(NewsCategory::General.as_str(), "general");
    }
}
