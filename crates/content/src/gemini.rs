//! Gemini `generateContent` adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ContentError, Result};
use crate::generator::ContentGenerator;
use crate::prompts::{build_prompt, parse_response};
use crate::request::{GeneratedContent, GenerationRequest};

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Contents<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Contents<'a>>,
    generation_config: GenerationSettings,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini text generator
pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    prompt_version: String,
    temperature: f32,
}

impl GeminiGenerator {
    pub fn from_config(config: &config::GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ContentError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.key().map(str::to_string),
            prompt_version: config.prompt_version.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ContentError::NotConfigured("generation"))?;

        let prompt = build_prompt(request);
        let body = GenerateRequest {
            contents: vec![Contents {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationSettings {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ContentError::Connection(format!("request timed out: {}", e))
                } else {
                    ContentError::Connection(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Status { status, body });
        }

        let decoded: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ContentError::Connection(e.to_string()))?;
        let text = decoded.text().ok_or(ContentError::EmptyResponse)?;
        debug!(chars = text.len(), "Received generated text");

        Ok(parse_response(&text, request, &self.model, &self.prompt_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"{\"title\":"},{"text":"\"X\"}"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"title\":\"X\"}"));
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_unconfigured_without_key() {
        let generator = GeminiGenerator::from_config(&config::GenerationConfig::default()).unwrap();
        assert!(!generator.is_configured());
    }
}
