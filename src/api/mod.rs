pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::VulnexConfig;
use crate::db::Database;
use crate::llm::AgentProvider;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub agent: Arc<dyn AgentProvider>,
    pub config: Arc<VulnexConfig>,
    /// Cancellation tokens for in-flight extractions, keyed by report id.
    /// Doubles as a guard against concurrent extraction of the same report.
    pub active_extractions: Arc<DashMap<i64, CancellationToken>>,
}

impl AppState {
    pub fn new(db: Database, agent: Arc<dyn AgentProvider>, config: Arc<VulnexConfig>) -> Self {
        Self {
            db,
            agent,
            config,
            active_extractions: Arc::new(DashMap::new()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/reports", axum::routing::post(routes::reports::create_report))
        .route("/api/reports/{id}", axum::routing::get(routes::reports::get_report))
        .route(
            "/api/reports/{id}/vulnerabilities",
            axum::routing::get(routes::reports::list_vulnerabilities),
        )
        .route(
            "/api/reports/{id}/extract-vulnerabilities",
            axum::routing::post(routes::extract::extract_vulnerabilities),
        )
        .route(
            "/api/reports/{id}/extract-vulnerabilities/cancel",
            axum::routing::post(routes::extract::cancel_extraction),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
