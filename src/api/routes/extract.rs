use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use dashmap::mapref::entry::Entry;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::api::AppState;
use crate::extraction::ExtractionOrchestrator;
use crate::models::{ExtractionOptions, ExtractionResult};

/// `POST /api/reports/{id}/extract-vulnerabilities`
///
/// Success (including the "nothing found" case) is `200 OK` with the
/// `ExtractionResult` body. Every pipeline failure collapses to
/// `400 Bad Request` with the error message: callers distinguish failure
/// kinds by text, not status code.
pub async fn extract_vulnerabilities(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<ExtractionResult>, (StatusCode, Json<Value>)> {
    let options: ExtractionOptions = if body.is_empty() {
        ExtractionOptions::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("Invalid extraction options: {}", e)})),
            )
        })?
    };

    let cancel = CancellationToken::new();
    match state.active_extractions.entry(id) {
        Entry::Occupied(_) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("Extraction already running for report {}", id)})),
            ));
        }
        Entry::Vacant(entry) => {
            entry.insert(cancel.clone());
        }
    }

    let orchestrator = ExtractionOrchestrator::new(
        Arc::new(state.db.clone()),
        Arc::new(state.db.clone()),
        state.agent.clone(),
        &state.config.extraction,
    );
    let result = orchestrator.extract(id, &options, &cancel).await;
    state.active_extractions.remove(&id);

    match result {
        Ok(result) => Ok(Json(result)),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": e.to_string()})),
        )),
    }
}

/// `POST /api/reports/{id}/extract-vulnerabilities/cancel`
pub async fn cancel_extraction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(entry) = state.active_extractions.get(&id) {
        entry.cancel();
        Ok(Json(json!({"cancelled": true})))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "No active extraction for report"})),
        ))
    }
}
