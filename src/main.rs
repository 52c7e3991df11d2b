use clap::Parser;
use tracing_subscriber::EnvFilter;

use vulnex::cli::{self, Commands};
use vulnex::errors::VulnexError;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => cli::serve::handle_serve(args).await,
        Commands::Extract(args) => cli::extract::handle_extract(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            VulnexError::Config(_) | VulnexError::MissingApiKey(_) => 2,
            VulnexError::ReportNotFound(_) => 3,
            VulnexError::Cancelled(_) => 130,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
