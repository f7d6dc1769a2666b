//! Prompt construction and response parsing
//!
//! Every prompt asks for a bare JSON object with `title`, `excerpt`, `body`
//! and `tags`. Models sometimes wrap it in code fences or ignore the format
//! entirely; [`parse_response`] copes with both.

use std::fmt::Write;

use common::MarketSnapshot;
use serde::Deserialize;

use crate::request::{GeneratedContent, GenerationRequest};

const NEWS_SUMMARY_CHARS: usize = 200;

const OUTPUT_FORMAT: &str = r#"## Output Format
Return ONLY a JSON object with this exact structure (no markdown code blocks):
{
  "title": "Article title here",
  "excerpt": "A 1-2 sentence summary for the article card",
  "body": "The full article body in markdown format",
  "tags": ["tag1", "tag2"]
}"#;

/// Build the full prompt for a request
pub fn build_prompt(request: &GenerationRequest) -> String {
    match request {
        GenerationRequest::Ticker {
            symbol,
            snapshot,
            is_breaking,
        } => ticker_prompt(symbol, snapshot, *is_breaking),
        GenerationRequest::WorldNews { items } => {
            let mut headlines = String::new();
            for (i, item) in items.iter().enumerate() {
                let _ = writeln!(
                    headlines,
                    "{}. \"{}\" ({}) - {}",
                    i + 1,
                    item.title,
                    item.source,
                    item.description.as_deref().map(truncate).unwrap_or("No description")
                );
            }

            format!(
                "You are a professional financial journalist. Write a world news briefing that \
                 synthesizes the following headlines and explains what they mean for investors.\n\n\
                 ## Headlines\n{headlines}\n\
                 ## Instructions\n\
                 1. Group related stories and lead with the most market-moving one\n\
                 2. Keep the tone professional but accessible\n\
                 3. Article should be 400-600 words\n\
                 4. Use markdown formatting with headers (##) and bullet points\n\
                 5. Do NOT include the title in the body\n\n\
                 {OUTPUT_FORMAT}\n\n\
                 Tags should include \"world-news\" plus relevant categories."
            )
        }
        GenerationRequest::Macro { topic } => format!(
            "You are a professional macro-economic analyst. Write an article about {}.\n\n\
             ## Instructions\n\
             1. Explain the current state of {} and the forces driving it\n\
             2. Discuss implications for equities, bonds and currencies\n\
             3. Keep the tone professional but accessible\n\
             4. Article should be 400-600 words\n\
             5. Use markdown formatting with headers (##) and bullet points\n\
             6. Do NOT include the title in the body\n\n\
             {OUTPUT_FORMAT}\n\n\
             Tags should include \"macro\" and \"{}\".",
            topic.label(),
            topic.label(),
            topic.as_str()
        ),
    }
}

fn ticker_prompt(symbol: &str, snapshot: &MarketSnapshot, is_breaking: bool) -> String {
    let mut news = String::new();
    for (i, item) in snapshot.news.iter().take(3).enumerate() {
        let _ = writeln!(
            news,
            "{}. \"{}\" - {}",
            i + 1,
            item.headline,
            item.summary.as_deref().map(truncate).unwrap_or("No summary")
        );
    }
    if news.is_empty() {
        news.push_str("No recent news available\n");
    }

    let price = match &snapshot.latest_bar {
        Some(bar) => format!(
            "Current price: ${:.2}, Change: {}%",
            bar.close,
            snapshot
                .change_percent
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "N/A".to_string())
        ),
        None => "Price data unavailable".to_string(),
    };

    let kind = if is_breaking {
        "breaking news"
    } else {
        "routine market update"
    };

    format!(
        "You are a professional financial journalist. Write a {kind} article about {symbol}.\n\n\
         ## Market Data\n{price}\n\n\
         ## Recent News Headlines\n{news}\n\
         ## Instructions\n\
         1. Write a professional, informative article about {symbol}'s current market situation\n\
         2. Include analysis of the price movement and any relevant news\n\
         3. Keep the tone professional but accessible\n\
         4. Article should be 300-500 words\n\
         5. Use markdown formatting with headers (##), bullet points, and bold text where appropriate\n\
         6. Do NOT include the title in the body - just the content\n\
         7. Focus on facts and market analysis, avoid speculation\n\
         8. If news is limited, focus on technical analysis and market context\n\n\
         {OUTPUT_FORMAT}\n\n\
         The tags should be relevant categories like \"earnings\", \"tech-sector\", \"market-analysis\", \"breaking-news\", etc."
    )
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(NEWS_SUMMARY_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Remove markdown code fences around a JSON payload
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Turn raw model output into content, falling back to templates per field
pub fn parse_response(
    raw: &str,
    request: &GenerationRequest,
    model: &str,
    prompt_version: &str,
) -> GeneratedContent {
    let parsed = serde_json::from_str::<RawArticle>(&strip_code_fences(raw)).unwrap_or_default();
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    GeneratedContent {
        title: non_empty(parsed.title).unwrap_or_else(|| request.fallback_title()),
        excerpt: non_empty(parsed.excerpt).unwrap_or_else(|| request.fallback_excerpt()),
        body_markdown: non_empty(parsed.body).unwrap_or_else(|| raw.trim().to_string()),
        tags: parsed
            .tags
            .filter(|tags| !tags.is_empty())
            .unwrap_or_else(|| request.fallback_tags()),
        model: model.to_string(),
        prompt_version: prompt_version.to_string(),
    }
}
