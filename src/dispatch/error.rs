use thiserror::Error;

use crate::llm::BackendError;
use crate::tools::{ToolError, UnknownTool, ValidationErrors};

/// Errors surfaced to callers of the dispatcher
///
/// Everything that goes wrong after validation is reported as `Processing`
/// with the underlying message; nothing is retried.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// No tool is registered under this name
    #[error("Invalid tool name: {0}")]
    UnknownTool(String),

    /// The input did not satisfy the tool's schema
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Prompt construction, the completion call or response shaping failed
    #[error("{0}")]
    Processing(String),
}

impl DispatchError {
    /// Stable short name, used in logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnknownTool(_) => "unknown_tool",
            DispatchError::Validation(_) => "validation_error",
            DispatchError::Processing(_) => "processing_error",
        }
    }
}

impl From<UnknownTool> for DispatchError {
    fn from(err: UnknownTool) -> Self {
        DispatchError::UnknownTool(err.0)
    }
}

impl From<ToolError> for DispatchError {
    fn from(err: ToolError) -> Self {
        DispatchError::Processing(err.to_string())
    }
}

impl From<BackendError> for DispatchError {
    fn from(err: BackendError) -> Self {
        DispatchError::Processing(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_becomes_processing() {
        let err: DispatchError = BackendError::NetworkError {
            message: "connection reset".to_string(),
        }
        .into();

        assert_eq!(err.kind(), "processing_error");
        assert_eq!(err.to_string(), "Network error: connection reset");
    }

    #[test]
    fn test_unknown_tool_conversion() {
        let err: DispatchError = UnknownTool("nope".to_string()).into();
        assert!(matches!(err, DispatchError::UnknownTool(ref name) if name == "nope"));
        assert_eq!(err.kind(), "unknown_tool");
    }

    #[test]
    fn test_tool_error_keeps_message() {
        let err: DispatchError = ToolError::PromptBuild("no data".to_string()).into();
        assert_eq!(err.to_string(), "Failed to build prompt: no data");
    }
}
