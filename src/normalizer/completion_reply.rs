use serde_json::Value;

/// Reported when the provider flags an error without a readable message.
pub const UPSTREAM_ERROR_FALLBACK: &str = "Groq request failed";

/// Decoded chat-completion reply.
///
/// Provider replies are untrusted JSON of unknown shape, so decoding never fails:
/// anything unrecognized lands in `Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionReply {
    /// `choices[0].message.content`, trimmed and non-empty.
    Content(String),
    /// `choices[0].text` from older completion-style replies, trimmed and non-empty.
    LegacyText(String),
    /// Explicit `error` field. Takes precedence over any choices present.
    Error(String),
    Empty,
}

impl CompletionReply {
    pub fn decode(payload: &Value) -> Self {
        if let Some(error) = payload.get("error").filter(|e| is_set(e)) {
            return Self::Error(error_message(error));
        }

        let first_choice = payload
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first());

        if let Some(content) = first_choice
            .and_then(|choice| choice.pointer("/message/content"))
            .and_then(non_blank)
        {
            return Self::Content(content);
        }

        if let Some(text) = first_choice
            .and_then(|choice| choice.get("text"))
            .and_then(non_blank)
        {
            return Self::LegacyText(text);
        }

        Self::Empty
    }

    /// The summary text, if the reply carried one.
    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::Content(text) | Self::LegacyText(text) => Some(text),
            Self::Error(_) | Self::Empty => None,
        }
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn error_message(error: &Value) -> String {
    non_blank(error)
        .or_else(|| error.get("message").and_then(non_blank))
        .unwrap_or_else(|| UPSTREAM_ERROR_FALLBACK.to_string())
}
