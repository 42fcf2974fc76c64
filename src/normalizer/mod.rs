//! Normalization of loosely-shaped values into the canonical shapes the relays use.

mod completion_reply;
mod recipients;

pub use completion_reply::{CompletionReply, UPSTREAM_ERROR_FALLBACK};
pub use recipients::{normalize_recipients, RecipientsInput};
