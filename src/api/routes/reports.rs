use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::api::models::CreateReportRequest;
use crate::api::AppState;
use crate::errors::VulnexError;

pub async fn create_report(
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if req.title.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Report title must not be empty"})),
        ));
    }

    let id = state.db.insert_report(&req.title, &req.markdown).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "title": req.title,
            "content_bytes": req.markdown.len(),
        })),
    ))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, VulnexError> {
    let report = state
        .db
        .get_report(id)?
        .ok_or(VulnexError::ReportNotFound(id))?;

    Ok(Json(json!({
        "id": report.id,
        "title": report.title,
        "content_bytes": report.content_bytes(),
        "created_at": report.created_at,
    })))
}

pub async fn list_vulnerabilities(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, VulnexError> {
    state
        .db
        .get_report(id)?
        .ok_or(VulnexError::ReportNotFound(id))?;

    let vulnerabilities = state.db.get_vulnerabilities(id)?;
    let total = vulnerabilities.len();
    Ok(Json(json!({
        "vulnerabilities": vulnerabilities,
        "total": total,
    })))
}
