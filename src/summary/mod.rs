//! Summary relay: turns a transcript plus an instruction into one chat-completion call
//! and normalizes the provider's reply into summary text.

use crate::api::error::{RelayError, RelayResult};
use crate::config::CompletionConfig;
use crate::normalizer::CompletionReply;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

pub mod groq;

pub use groq::GroqProvider;

pub const DEFAULT_INSTRUCTION: &str = "Summarize in bullet points for executives.";

pub const SYSTEM_PROMPT: &str = "You are a meeting summarizer.
- Follow user instructions exactly.
- Prefer bullet points.
- Include Action Items, Decisions, Open Questions if present.
- Do not invent info.";

pub const NO_SUMMARY_CONTENT: &str = "Groq returned no summary content";

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub transcript: Option<String>,
    /// The browser client sends this as `prompt`.
    #[serde(default, alias = "prompt")]
    pub instruction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI-compatible chat-completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

/// External chat-completion service.
///
/// Implementations return the provider's raw JSON reply whatever the HTTP status;
/// only transport failures are errors.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, request: &ChatRequest) -> Result<Value>;
}

/// The caller's instruction, trimmed, or the default when absent or blank.
pub fn resolve_instruction(instruction: Option<&str>) -> &str {
    instruction
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_INSTRUCTION)
}

pub fn build_chat_request(
    settings: &CompletionConfig,
    instruction: &str,
    transcript: &str,
) -> ChatRequest {
    ChatRequest {
        model: settings.model.clone(),
        temperature: settings.temperature,
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Instruction: {}\n\nTranscript:\n{}",
                instruction, transcript
            )),
        ],
    }
}

/// Run one summary request through `provider`. No retries.
pub async fn generate(
    provider: &dyn CompletionProvider,
    settings: &CompletionConfig,
    request: &GenerateRequest,
) -> RelayResult<String> {
    let transcript = request
        .transcript
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| RelayError::validation("Transcript required"))?;

    let instruction = resolve_instruction(request.instruction.as_deref());
    let chat = build_chat_request(settings, instruction, transcript);

    info!(
        "Requesting summary from {} ({} transcript chars, model {})",
        provider.name(),
        transcript.len(),
        chat.model
    );

    let payload = provider.complete(&chat).await?;
    debug!(provider = provider.name(), payload = %payload, "Completion provider raw response");

    let reply = CompletionReply::decode(&payload);
    if let Some(summary) = reply.summary() {
        info!("Summary ready: {} chars", summary.len());
        return Ok(summary.to_string());
    }

    warn!(
        provider = provider.name(),
        payload = %payload,
        "Completion provider returned no summary"
    );
    match reply {
        CompletionReply::Error(message) => Err(RelayError::Upstream(message)),
        _ => Err(RelayError::Upstream(NO_SUMMARY_CONTENT.to_string())),
    }
}
