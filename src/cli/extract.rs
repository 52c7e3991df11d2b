use std::sync::Arc;

use console::style;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::commands::ExtractArgs;
use crate::db::Database;
use crate::errors::VulnexError;
use crate::extraction::ExtractionOrchestrator;
use crate::llm::{AgentProvider, GeminiClient};
use crate::models::ExtractionOptions;

pub async fn handle_extract(args: ExtractArgs) -> Result<(), VulnexError> {
    let config = crate::config::load(args.config.as_deref())?;
    let db = Database::new(&args.db)?;
    let agent: Arc<dyn AgentProvider> = Arc::new(GeminiClient::from_config(&config.gemini)?);

    let orchestrator = ExtractionOrchestrator::new(
        Arc::new(db.clone()),
        Arc::new(db),
        agent,
        &config.extraction,
    );
    let options = ExtractionOptions {
        max_candidates: args.max_candidates,
        min_confidence: args.min_confidence,
    };

    // Ctrl-C aborts the in-flight provider call
    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling extraction");
            ctrl_c_token.cancel();
        }
    });

    let result = orchestrator.extract(args.report_id, &options, &cancel).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    println!(
        "{} created, {} duplicates skipped, {} warnings, {} errors in {}ms",
        style(result.total_created).green(),
        style(result.duplicates_skipped).yellow(),
        result.validation_warnings.len(),
        style(result.processing_errors.len()).red(),
        result.processing_time_ms,
    );
    Ok(())
}
