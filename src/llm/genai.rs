//! GenAI-based completion gateway
//!
//! This module provides an [`LLMClient`] implementation using the `genai` crate.
//! Requests carry a JSON-schema response format, so providers with native
//! structured-output support (OpenAI, Gemini, Ollama) return an object that
//! already conforms to the tool's output schema.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{ChatMessage, CompletionRequest, CompletionResponse, MessageRole};
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{
    ChatMessage as GenAIChatMessage, ChatOptions, ChatRequest as GenAIChatRequest,
    ChatResponseFormat, JsonSpec,
};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// GenAI-based structured completion client
pub struct GenAIClient {
    /// GenAI client instance
    client: Client,
    /// Default model name
    model: String,
    /// Provider type
    provider: AdapterKind,
    /// Request timeout
    timeout: Duration,
}

impl GenAIClient {
    /// Creates a new GenAI client
    ///
    /// # Arguments
    ///
    /// * `provider` - LLM provider to use
    /// * `model` - Model name (without provider prefix)
    /// * `timeout` - Request timeout
    /// * `endpoint` - Base URL replacing the provider's default one
    pub fn with_endpoint(
        provider: AdapterKind,
        model: String,
        timeout: Duration,
        endpoint: Option<String>,
    ) -> Self {
        let client = if let Some(endpoint_url) = endpoint {
            debug!(
                "Using custom endpoint for {}: {}",
                provider.as_str(),
                endpoint_url
            );

            let model_clone = model.clone();

            let resolver = ServiceTargetResolver::from_resolver_fn(
                move |_service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error>
                {
                    let endpoint = Endpoint::from_owned(endpoint_url.clone());

                    let auth = match provider.default_key_env_name() {
                        Some(api_key_var) => AuthData::from_env(api_key_var),
                        None => AuthData::from_single(""),
                    };

                    Ok(ServiceTarget {
                        endpoint,
                        auth,
                        model: ModelIden::new(provider, &model_clone),
                    })
                },
            );

            Client::builder()
                .with_service_target_resolver(resolver)
                .build()
        } else {
            Client::default()
        };

        debug!(
            "Creating GenAI client: provider={}, model={}",
            provider.as_str(),
            model,
        );

        Self {
            client,
            model,
            provider,
            timeout,
        }
    }

    fn convert_message(msg: &ChatMessage) -> GenAIChatMessage {
        match msg.role {
            MessageRole::System => GenAIChatMessage::system(&msg.content),
            MessageRole::User => GenAIChatMessage::user(&msg.content),
            MessageRole::Assistant => GenAIChatMessage::assistant(&msg.content),
        }
    }

    fn parse_structured(&self, text: &str) -> Result<Value, BackendError> {
        let value: Value =
            serde_json::from_str(text.trim()).map_err(|e| BackendError::InvalidResponse {
                message: format!("{} returned non-JSON content: {}", self.provider.as_str(), e),
                raw_response: Some(text.to_string()),
            })?;

        if !value.is_object() {
            return Err(BackendError::InvalidResponse {
                message: "structured response is not a JSON object".to_string(),
                raw_response: Some(text.to_string()),
            });
        }

        Ok(value)
    }
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        let start = Instant::now();

        let messages: Vec<GenAIChatMessage> =
            request.messages.iter().map(Self::convert_message).collect();
        let genai_request = GenAIChatRequest::new(messages);

        let spec = JsonSpec::new(
            request.response_format.name.clone(),
            request.response_format.schema.clone(),
        );
        let options = ChatOptions::default()
            .with_temperature(request.temperature as f64)
            .with_response_format(ChatResponseFormat::JsonSpec(spec));

        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };

        let response = match tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(model, genai_request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("{} API error: {}", self.provider.as_str(), e);
                return Err(BackendError::ApiError {
                    message: format!("{} request failed: {}", self.provider.as_str(), e),
                    status_code: None,
                });
            }
            Err(_) => {
                error!(
                    "{} request timed out after {}s",
                    self.provider.as_str(),
                    self.timeout.as_secs()
                );
                return Err(BackendError::TimeoutError {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let text = response.first_text().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(BackendError::InvalidResponse {
                message: format!("{} returned an empty completion", self.provider.as_str()),
                raw_response: None,
            });
        }

        let content = self.parse_structured(text)?;

        debug!(
            model = model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Structured completion received"
        );

        Ok(CompletionResponse::new(content, start.elapsed()))
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
