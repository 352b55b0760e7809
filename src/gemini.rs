//! Gemini API client for the analyze endpoint
//!
//! One outbound `generateContent` call per request, no retries.
//! Uses a long-lived reqwest::Client for connection pooling.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analysis::TextGenerator;
use crate::config::Config;
use crate::error::ForecastError;
use crate::Result;

const SYSTEM_PROMPT: &str = r#"You are a personal finance assistant.

Guidelines:
- Ground every statement in the figures provided
- Be structured and concise
- Point out risks as well as opportunities
- Avoid recommending specific securities"#;

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model_id: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, model_id: String) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model_id,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
            config.model_id.clone(),
        )
    }

    fn ensure_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ForecastError::Upstream(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }
        Ok(())
    }

    fn build_request(prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 2048,
            },
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.ensure_key()?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model_id);
        let request = Self::build_request(prompt);

        info!(model = %self.model_id, "Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                ForecastError::Upstream(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Gemini API error response: {}", error_text);
            return Err(ForecastError::Upstream(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            ForecastError::Upstream(format!("Gemini parse error: {}", e))
        })?;

        let text = extract_text(&gemini_response)?;

        info!(
            finish_reason = ?gemini_response.candidates.first().and_then(|c| c.finish_reason.as_deref()),
            output_tokens = ?gemini_response.usage_metadata.as_ref().map(|u| u.candidates_token_count),
            "Gemini response received"
        );

        Ok(text)
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        self.ensure_key()?;

        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ForecastError::Upstream(format!("Gemini API error: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ForecastError::Upstream(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let listing: ModelList = response
            .json()
            .await
            .map_err(|e| ForecastError::Upstream(format!("Gemini parse error: {}", e)))?;

        Ok(listing.models.into_iter().map(|m| m.name).collect())
    }
}

/// Concatenate the text parts of the first candidate, trimmed
fn extract_text(response: &GeminiResponse) -> Result<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| ForecastError::Upstream("No response from Gemini API".to_string()))?;

    let text: String = candidate
        .content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(ForecastError::Upstream(
            "Empty response from Gemini".to_string(),
        ));
    }

    Ok(text.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    candidates_token_count: i32,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}
