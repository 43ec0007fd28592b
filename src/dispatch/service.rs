//! Tool dispatch
//!
//! `ToolDispatcher` is the single entry point for running a tool:
//!
//! 1. Resolves the tool in the registry
//! 2. Validates the raw payload against the tool's input schema
//! 3. Builds the prompt
//! 4. Calls the completion service with the strict output schema, the
//!    configured model and zero temperature
//! 5. Checks the structured response against the output type
//!
//! The dispatcher holds no mutable state, so one instance is shared by all
//! concurrent requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::error::DispatchError;
use crate::llm::{CompletionRequest, LLMClient};
use crate::tools::{ToolOptions, ToolRegistry};

/// Sampling temperature for every completion; repeated calls should be as
/// reproducible as the provider allows
pub const SAMPLING_TEMPERATURE: f32 = 0.0;

/// Successful invocation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub tool: String,
    pub response: Value,
}

/// Declared options of one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsView {
    pub tool: String,
    pub options: ToolOptions,
}

pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    client: Arc<dyn LLMClient>,
    model: String,
}

impl ToolDispatcher {
    pub fn new(
        registry: Arc<ToolRegistry>,
        client: Arc<dyn LLMClient>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            client,
            model: model.into(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tool_names(&self) -> BTreeSet<String> {
        self.registry.names()
    }

    /// Runs one tool invocation end to end
    pub async fn invoke(&self, tool: &str, raw_input: Value) -> Result<Invocation, DispatchError> {
        let start = Instant::now();
        let descriptor = self.registry.lookup(tool)?;

        let input = descriptor.validate(&raw_input).map_err(|errors| {
            debug!(tool = tool, errors = errors.len(), "Input rejected");
            errors
        })?;

        let messages = descriptor.build_prompt(&input)?;
        debug!(tool = tool, messages = messages.len(), "Prompt built");

        let request = CompletionRequest::new(
            self.model.clone(),
            messages,
            descriptor.response_format().clone(),
        )
        .with_temperature(SAMPLING_TEMPERATURE);

        let completion = self.client.complete(request).await.map_err(|e| {
            warn!(tool = tool, client = self.client.name(), error = %e, "Completion failed");
            e
        })?;

        let response = descriptor.shape_response(completion.content).map_err(|e| {
            warn!(tool = tool, error = %e, "Completion does not match output schema");
            e
        })?;

        info!(
            tool = tool,
            model = %self.model,
            llm_ms = completion.response_time.as_millis() as u64,
            total_ms = start.elapsed().as_millis() as u64,
            "Tool invocation completed"
        );

        Ok(Invocation {
            tool: tool.to_string(),
            response,
        })
    }

    /// Declared options of a tool; empty when it declares none
    pub fn options(&self, tool: &str) -> Result<OptionsView, DispatchError> {
        let descriptor = self.registry.lookup(tool)?;
        Ok(OptionsView {
            tool: tool.to_string(),
            options: descriptor.options().clone(),
        })
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("registry", &self.registry)
            .field("client", &self.client.name())
            .field("model", &self.model)
            .finish()
    }
}
