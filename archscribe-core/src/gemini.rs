//! Gemini `generateContent` implementation of [`AnalysisClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contract::AnalysisClient;
use crate::error::HostError;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: String,
}

/// Generation settings for [`GeminiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct GeminiClient {
    api_key: String,
    settings: GeminiSettings,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, settings: GeminiSettings) -> Result<Self, HostError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        info!(model = %settings.model, "Initialised Gemini client");
        Ok(Self {
            api_key,
            settings,
            client,
        })
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, HostError> {
        let url = format!(
            "{}/{}:generateContent",
            self.settings.api_url.trim_end_matches('/'),
            self.settings.model
        );
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        };

        debug!(%url, prompt_chars = prompt.len(), "Calling Gemini generateContent");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| -> HostError { format!("Gemini API request failed: {e}").into() })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("Gemini API error ({status}): {error_text}").into());
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| -> HostError { format!("Failed to parse Gemini response: {e}").into() })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        debug!(reply_chars = text.len(), "Received Gemini reply");
        Ok(text)
    }
}
