use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub title: String,
    pub markdown: String,
}
