use super::error::BackendError;
use super::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

/// Structured completion gateway
///
/// Implementations make exactly one attempt per call and surface every
/// provider-side failure as a [`BackendError`].
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, BackendError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}
