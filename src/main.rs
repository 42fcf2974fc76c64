use anyhow::Result;
use clap::Parser;
use meetmail::{
    app,
    cli::{handle_config_command, handle_summarize_command, load_config, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config_path = cli.config.clone();
    let config = || load_config(config_path.as_deref(), cli.port);

    match cli.command {
        Some(CliCommand::Version) => {
            println!("meetmail {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Config) => handle_config_command(&config()?),
        Some(CliCommand::Summarize(args)) => handle_summarize_command(args, &config()?).await,
        None => app::run_service(config()?).await,
    }
}
