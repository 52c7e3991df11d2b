use std::sync::Arc;

use tracing::info;

use super::commands::ServeArgs;
use crate::api::{build_router, AppState};
use crate::db::Database;
use crate::errors::VulnexError;
use crate::llm::{AgentProvider, GeminiClient};

pub async fn handle_serve(args: ServeArgs) -> Result<(), VulnexError> {
    let config = Arc::new(crate::config::load(args.config.as_deref())?);
    if config.gemini.api_key.is_none() {
        tracing::warn!("No Gemini API key configured; extraction requests will fail");
    }

    let db = Database::new(&args.db)?;
    let agent: Arc<dyn AgentProvider> = Arc::new(GeminiClient::from_config(&config.gemini)?);
    let state = AppState::new(db, agent, config);
    let router = build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "vulnex API listening");
    axum::serve(listener, router).await?;
    Ok(())
}
