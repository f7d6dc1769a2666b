//! Deterministic fallback content
//!
//! Used whenever the generator is unavailable or fails, so a pipeline run
//! still publishes something. Output depends only on the arguments.

use chrono::{DateTime, SecondsFormat, Utc};
use common::WorldNewsItem;

use crate::request::{GeneratedContent, MacroTopic};

/// Model name recorded on placeholder content
pub const PLACEHOLDER_MODEL: &str = "placeholder";
/// Prompt version recorded on placeholder content
pub const PLACEHOLDER_PROMPT_VERSION: &str = "v0";

fn content(title: String, excerpt: String, body_markdown: String, tags: Vec<String>) -> GeneratedContent {
    GeneratedContent {
        title,
        excerpt,
        body_markdown,
        tags,
        model: PLACEHOLDER_MODEL.to_string(),
        prompt_version: PLACEHOLDER_PROMPT_VERSION.to_string(),
    }
}

fn date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn tag_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

/// Routine or breaking ticker update
pub fn ticker(symbol: &str, published_at: DateTime<Utc>, is_breaking: bool) -> GeneratedContent {
    let title = format!("{symbol} Market Update — {}", date(published_at));
    let excerpt = if is_breaking {
        format!("Breaking update for {symbol}.")
    } else {
        format!("Routine market update for {symbol}.")
    };
    let body = [
        format!("# {title}"),
        String::new(),
        format!("This is an auto-generated placeholder article for **{symbol}**."),
        String::new(),
        "## Key points".to_string(),
        format!("- Published at: {}", timestamp(published_at)),
        format!("- Category: {}", if is_breaking { "Breaking" } else { "Routine" }),
        String::new(),
        "## Next steps".to_string(),
        "- Refresh the market snapshot".to_string(),
        "- Regenerate the full analysis".to_string(),
    ]
    .join("\n");

    let tags = if is_breaking {
        tag_list(&["breaking-news", "market-update"])
    } else {
        tag_list(&["market-update"])
    };
    content(title, excerpt, body, tags)
}

/// Breaking event article built from the event's templated title and excerpt
pub fn breaking(
    symbol: &str,
    title: &str,
    excerpt: &str,
    reason: &str,
    published_at: DateTime<Utc>,
) -> GeneratedContent {
    let body = [
        format!("# {title}"),
        String::new(),
        excerpt.to_string(),
        String::new(),
        "## What happened".to_string(),
        format!("- Symbol: **{symbol}**"),
        format!("- Trigger: {reason}"),
        format!("- Detected at: {}", timestamp(published_at)),
        String::new(),
        "Full analysis will follow as more information becomes available.".to_string(),
    ]
    .join("\n");

    content(
        title.to_string(),
        excerpt.to_string(),
        body,
        tag_list(&["breaking-news", "market-update"]),
    )
}

/// Digest of world headlines
pub fn world_news(items: &[WorldNewsItem], published_at: DateTime<Utc>) -> GeneratedContent {
    let title = format!("World News Roundup — {}", date(published_at));
    let excerpt = format!("{} top stories from around the world.", items.len());

    let mut lines = vec![
        format!("# {title}"),
        String::new(),
        "## Top stories".to_string(),
    ];
    for item in items {
        lines.push(format!("- **{}** ({}) [Read more]({})", item.title, item.source, item.url));
    }
    lines.push(String::new());
    lines.push(format!("_Compiled at {}_", timestamp(published_at)));

    content(title, excerpt, lines.join("\n"), tag_list(&["world-news", "breaking-news"]))
}

/// Macro topic overview
pub fn macro_topic(topic: MacroTopic, published_at: DateTime<Utc>) -> GeneratedContent {
    let title = format!("{} Outlook — {}", topic.label(), date(published_at));
    let excerpt = format!("Macro update on {}.", topic.label());
    let body = [
        format!("# {title}"),
        String::new(),
        format!("This is an auto-generated placeholder overview of **{}**.", topic.label()),
        String::new(),
        "## Key points".to_string(),
        format!("- Topic: {}", topic.as_str()),
        format!("- Published at: {}", timestamp(published_at)),
    ]
    .join("\n");

    content(title, excerpt, body, vec!["macro".to_string(), topic.as_str().to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 30, 5).unwrap()
    }

    #[test]
    fn test_ticker_placeholder_names_symbol_and_date() {
        let content = ticker("AAPL", noon(), false);

        assert_eq!(content.title, "AAPL Market Update — 2026-03-14");
        assert_eq!(content.excerpt, "Routine market update for AAPL.");
        assert!(content.body_markdown.contains("**AAPL**"));
        assert!(content.body_markdown.contains("2026-03-14"));
        assert!(content.body_markdown.contains("Category: Routine"));
        assert_eq!(content.tags, vec!["market-update"]);
        assert_eq!(content.model, PLACEHOLDER_MODEL);
    }

    #[test]
    fn test_ticker_placeholder_breaking() {
        let content = ticker("TSLA", noon(), true);

        assert_eq!(content.excerpt, "Breaking update for TSLA.");
        assert!(content.body_markdown.contains("Category: Breaking"));
        assert_eq!(content.tags, vec!["breaking-news", "market-update"]);
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        assert_eq!(ticker("AAPL", noon(), false), ticker("AAPL", noon(), false));
    }

    #[test]
    fn test_world_news_placeholder_lists_headlines() {
        let items = vec![WorldNewsItem {
            title: "Markets rally".into(),
            description: None,
            source: "Reuters".into(),
            url: "https://example.com/1".into(),
            image_url: None,
            published_at: None,
            content: None,
        }];
        let content = world_news(&items, noon());

        assert_eq!(content.title, "World News Roundup — 2026-03-14");
        assert!(content
            .body_markdown
            .contains("- **Markets rally** (Reuters) [Read more](https://example.com/1)"));
    }

    #[test]
    fn test_macro_placeholder() {
        let content = macro_topic(MacroTopic::FedPolicy, noon());

        assert_eq!(content.title, "Federal Reserve Policy Outlook — 2026-03-14");
        assert_eq!(content.tags, vec!["macro", "fed-policy"]);
    }

    #[test]
    fn test_breaking_placeholder_keeps_templates() {
        let content = breaking(
            "NVDA",
            "NVDA Soars 12.00% on Heavy Trading",
            "Breaking: NVDA experiences significant movement with 12.00% change.",
            "Surged 12.00% in recent trading",
            noon(),
        );

        assert_eq!(content.title, "NVDA Soars 12.00% on Heavy Trading");
        assert!(content.body_markdown.contains("Trigger: Surged 12.00% in recent trading"));
        assert_eq!(content.tags, vec!["breaking-news", "market-update"]);
    }
}
