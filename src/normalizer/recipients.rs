use serde::{Deserialize, Serialize};

/// Recipients as callers send them: a JSON list or one comma-delimited string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipientsInput {
    List(Vec<String>),
    Delimited(String),
}

impl From<&str> for RecipientsInput {
    fn from(value: &str) -> Self {
        Self::Delimited(value.to_string())
    }
}

impl From<Vec<String>> for RecipientsInput {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Canonical recipient list: trimmed, empty entries dropped, input order kept.
pub fn normalize_recipients(input: &RecipientsInput) -> Vec<String> {
    let tokens: Box<dyn Iterator<Item = &str>> = match input {
        RecipientsInput::List(list) => Box::new(list.iter().map(String::as_str)),
        RecipientsInput::Delimited(text) => Box::new(text.split(',')),
    };

    tokens
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}
