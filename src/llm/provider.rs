use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::role::AgentRole;
use crate::errors::VulnexError;

/// Seam between the extraction pipeline and the generative-language-model
/// provider. The production implementation is `GeminiClient`; tests swap in
/// scripted fakes.
#[async_trait]
pub trait AgentProvider: Send + Sync {
    /// One request/response round trip. Returns the raw text payload from
    /// the provider's first non-empty candidate part.
    async fn call(
        &self,
        role: AgentRole,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, VulnexError>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}
