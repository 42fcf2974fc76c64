use crate::config::Config;
use crate::summary::{self, GenerateRequest, GroqProvider};
use anyhow::{Context, Result};
use std::path::Path;

mod args;

pub use args::{Cli, CliCommand, SummarizeCliArgs};

/// Resolve the process config, applying the `--port` override last.
pub fn load_config(path: Option<&Path>, port: Option<u16>) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    Ok(config)
}

pub fn handle_config_command(config: &Config) -> Result<()> {
    print!("{}", config.redacted().to_toml()?);

    let warnings = config.warnings();
    if !warnings.is_empty() {
        eprintln!();
        for warning in warnings {
            eprintln!("warning: {}", warning);
        }
    }
    Ok(())
}

pub async fn handle_summarize_command(args: SummarizeCliArgs, config: &Config) -> Result<()> {
    let transcript = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read transcript {:?}", args.file))?;

    let provider = GroqProvider::new(&config.completion)?;
    let request = GenerateRequest {
        transcript: Some(transcript),
        instruction: args.instruction,
    };

    let summary = summary::generate(&provider, &config.completion, &request).await?;
    println!("{}", summary);
    Ok(())
}
