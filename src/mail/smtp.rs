use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Mailer, OutgoingMail};
use crate::config::MailConfig;

/// Sends mail through an authenticated SMTP relay (Gmail by default).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Option<Mailbox>,
}

impl SmtpMailer {
    /// A missing sender is tolerated here and reported on each send.
    pub fn new(settings: &MailConfig) -> Result<Self> {
        let from = match settings.sender() {
            Some(sender) => Some(
                sender
                    .parse::<Mailbox>()
                    .with_context(|| format!("Invalid sender address '{}'", sender))?,
            ),
            None => {
                warn!("No mail sender configured; share requests will fail");
                None
            }
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
            .with_context(|| format!("Invalid SMTP relay host '{}'", settings.smtp_host))?;
        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        info!("Initialized SMTP mailer via {}", settings.smtp_host);

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<(Message, String)> {
        let from = self
            .from
            .clone()
            .context("Mail sender is not configured (set GMAIL_USER or MAIL_FROM)")?;
        let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

        let mut builder = Message::builder()
            .from(from)
            .subject(mail.subject.clone())
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML);
        for recipient in &mail.to {
            let mailbox = recipient
                .parse::<Mailbox>()
                .with_context(|| format!("Invalid recipient address '{}'", recipient))?;
            builder = builder.to(mailbox);
        }

        let message = builder
            .body(mail.html.clone())
            .context("Failed to build email message")?;
        Ok((message, message_id))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &'static str {
        "SMTP"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<String> {
        let (message, message_id) = self.build_message(mail)?;

        let response = self
            .transport
            .send(message)
            .await
            .context("SMTP server rejected the message")?;
        debug!(
            "SMTP response {:?}: {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );

        Ok(message_id)
    }
}
