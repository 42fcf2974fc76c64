use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meetmail")]
#[command(about = "Summarize meeting transcripts and share them by email", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: <config dir>/meetmail/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Listening port, overrides config and PORT
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// Show the effective configuration with secrets redacted
    Config,
    /// Summarize a transcript file and print the result
    Summarize(SummarizeCliArgs),
}

#[derive(ClapArgs, Debug)]
pub struct SummarizeCliArgs {
    /// Transcript text file
    pub file: PathBuf,
    /// Instruction for the summarizer (default: executive bullet points)
    #[arg(short, long)]
    pub instruction: Option<String>,
}
