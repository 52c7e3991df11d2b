use thiserror::Error;

#[derive(Debug, Error)]
pub enum VulnexError {
    #[error("Report not found: {0}")]
    ReportNotFound(i64),

    #[error("Report {0} has no markdown content")]
    NoContent(i64),

    #[error("Report content is too large: {size} bytes exceeds the {}MB limit", .limit / 1_000_000)]
    ContentTooLarge { size: usize, limit: usize },

    #[error("Gemini API key is missing: {0}")]
    MissingApiKey(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Gemini API error: {0}")]
    ProviderHttp(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Response parse error: {0}")]
    ResponseParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_too_large_message_names_limit_in_mb() {
        let err = VulnexError::ContentTooLarge {
            size: 6_000_000,
            limit: 5_000_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("too large"));
        assert!(msg.contains("5MB"));
        assert!(msg.contains("6000000"));
    }

    #[test]
    fn test_provider_http_message_prefix() {
        let err = VulnexError::ProviderHttp("401 Unauthorized: invalid key".into());
        assert!(err.to_string().starts_with("Gemini API error: 401 Unauthorized"));
    }
}
