use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::errors::VulnexError;

impl IntoResponse for VulnexError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            VulnexError::ReportNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            VulnexError::Database(_)
            | VulnexError::Io(_)
            | VulnexError::Json(_)
            | VulnexError::Yaml(_)
            | VulnexError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            _ => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        (status, Json(json!({"error": message}))).into_response()
    }
}
