use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ChatRequest, CompletionProvider};
use crate::config::CompletionConfig;

/// Groq's OpenAI-compatible chat completions endpoint.
pub struct GroqProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GroqProvider {
    pub fn new(settings: &CompletionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client for Groq")?;
        let base_url = settings.api_base.trim_end_matches('/').to_string();

        info!("Initialized Groq provider with base URL: {}", base_url);

        Ok(Self {
            client,
            api_key: settings.api_key.clone().unwrap_or_default(),
            base_url,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "Groq"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<Value> {
        let url = self.completions_url();
        debug!("Posting chat completion to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .context("Failed to reach Groq chat completions endpoint")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read Groq response body")?;

        if !status.is_success() {
            warn!("Groq responded with status {}", status);
        }

        serde_json::from_str(&response_text).with_context(|| {
            format!(
                "Groq returned a non-JSON body with status {}: {}",
                status, response_text
            )
        })
    }
}
