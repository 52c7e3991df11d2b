use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vulnex", version, about = "LLM-assisted vulnerability extraction for audit reports")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Run one extraction against a stored report and print the result
    Extract(ExtractArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// SQLite database path
    #[arg(long, default_value = "vulnex.db")]
    pub db: String,

    /// YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Id of the stored report to extract from
    pub report_id: i64,

    /// SQLite database path
    #[arg(long, default_value = "vulnex.db")]
    pub db: String,

    /// YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Cap on how many candidates proceed to deduplication
    #[arg(long)]
    pub max_candidates: Option<usize>,

    /// Drop candidates whose reported confidence is below this
    #[arg(long)]
    pub min_confidence: Option<f64>,
}
