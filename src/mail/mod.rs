//! Email relay: sends an edited summary to a list of recipients in one message.

use crate::api::error::{RelayError, RelayResult};
use crate::config::MailConfig;
use crate::normalizer::{normalize_recipients, RecipientsInput};
use anyhow::Result;
use async_trait::async_trait;
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod smtp;
mod template;

pub use smtp::SmtpMailer;
pub use template::{escape_html, render_summary_html};

/// Body of `POST /api/share`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareRequest {
    #[serde(default)]
    pub summary: Option<String>,
    /// The browser client sends this as `to`.
    #[serde(default, alias = "to")]
    pub recipients: Option<RecipientsInput>,
}

/// A composed message ready for the mail provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// External transactional mail service.
#[async_trait]
pub trait Mailer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deliver `mail` to all of its recipients in a single send and return the message id.
    async fn send(&self, mail: &OutgoingMail) -> Result<String>;
}

/// Validate the request and build the message, without sending.
pub fn compose(settings: &MailConfig, request: &ShareRequest) -> RelayResult<OutgoingMail> {
    let summary = request
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| RelayError::validation("Summary required"))?;

    let to = request
        .recipients
        .as_ref()
        .map(normalize_recipients)
        .unwrap_or_default();
    if to.is_empty() {
        return Err(RelayError::validation("Recipients required"));
    }

    if let Some(bad) = to.iter().find(|addr| addr.parse::<Mailbox>().is_err()) {
        return Err(RelayError::validation(format!("Invalid recipient: {}", bad)));
    }

    Ok(OutgoingMail {
        to,
        subject: settings.subject.clone(),
        html: render_summary_html(&settings.subject, summary),
    })
}

/// Run one share request through `mailer`. No retries.
pub async fn share(
    mailer: &dyn Mailer,
    settings: &MailConfig,
    request: &ShareRequest,
) -> RelayResult<String> {
    let mail = compose(settings, request)?;

    let message_id = mailer
        .send(&mail)
        .await
        .map_err(|e| RelayError::Delivery(format!("{:#}", e)))?;

    info!(
        message_id = %message_id,
        recipients = mail.to.len(),
        "Email sent via {}",
        mailer.name()
    );
    Ok(message_id)
}
