//! Narrative analysis through an external text-generation model
//!
//! Builds a prompt from free text and/or structured financial context and
//! hands it to a `TextGenerator`. The generator's answer is returned as-is.

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::ForecastError;
use crate::Result;

/// Trait for the outbound text-generation collaborator
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    fn model_id(&self) -> &str;

    /// Generate a trimmed text answer for a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifiers available to the configured key
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Validated analyze input: at least one of the two parts is present
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    prompt: String,
    context: Option<Value>,
}

impl AnalysisRequest {
    pub fn new(prompt: Option<&str>, context: Option<Value>) -> Result<Self> {
        let prompt = prompt.map(str::trim).unwrap_or_default().to_string();
        let context = context.filter(|c| !is_empty_context(c));

        if prompt.is_empty() && context.is_none() {
            return Err(ForecastError::validation("Provide 'prompt' or 'context'"));
        }

        Ok(Self { prompt, context })
    }

    /// Full prompt sent to the model
    pub fn to_prompt(&self) -> String {
        let context_text = match &self.context {
            Some(context) => format!(
                "\n\n[DATA CONTEXT]\n{}",
                serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string())
            ),
            None => String::new(),
        };

        format!(
            "You are a finance assistant. Analyze:\n\n{}{}",
            self.prompt, context_text
        )
    }

    /// Short fingerprint of the context for logs, so raw figures stay out of them
    pub fn context_fingerprint(&self) -> Option<String> {
        let context = self.context.as_ref()?;
        let digest = Sha256::digest(context.to_string().as_bytes());
        Some(hex::encode(&digest[..8]))
    }
}

fn is_empty_context(context: &Value) -> bool {
    match context {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Run one analysis against the generator, no retries
pub async fn analyze(generator: &dyn TextGenerator, request: &AnalysisRequest) -> Result<String> {
    info!(
        model = generator.model_id(),
        prompt_chars = request.prompt.len(),
        context = ?request.context_fingerprint(),
        "Running analysis"
    );

    let answer = generator.generate(&request.to_prompt()).await?;
    Ok(answer.trim().to_string())
}
