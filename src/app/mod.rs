use crate::api::{ApiServer, AppState};
use crate::config::Config;
use crate::mail::SmtpMailer;
use crate::summary::GroqProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run_service(config: Config) -> Result<()> {
    info!("Starting meetmail service");

    for warning in config.warnings() {
        warn!("{}", warning);
    }

    let completion = Arc::new(GroqProvider::new(&config.completion)?);
    let mailer = Arc::new(SmtpMailer::new(&config.mail)?);

    info!(
        "Summaries via {} ({}), mail via {}",
        config.completion.api_base, config.completion.model, config.mail.smtp_host
    );

    let state = AppState::new(config, completion, mailer);
    ApiServer::new(state).start().await
}
