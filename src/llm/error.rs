//! Completion gateway errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur while talking to the completion service
///
/// Every provider-side failure is folded into one of these variants so the
/// dispatcher only has to handle a single error type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackendError {
    /// API request failed with the given message
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// The provider answered, but not with an object matching the requested schema
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// Configuration error (missing API keys, invalid settings, etc.)
    ConfigurationError { message: String },

    /// Network-related error
    NetworkError { message: String },

    /// Generic error for other cases
    Other { message: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::InvalidResponse { message, .. } => {
                write!(f, "Invalid response from LLM: {}", message)
            }
            BackendError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            BackendError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            BackendError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_with_status() {
        let err = BackendError::ApiError {
            message: "quota exceeded".to_string(),
            status_code: Some(429),
        };
        assert_eq!(err.to_string(), "API error (429): quota exceeded");
    }

    #[test]
    fn test_api_error_display_without_status() {
        let err = BackendError::ApiError {
            message: "boom".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "API error: boom");
    }

    #[test]
    fn test_invalid_response_hides_raw_payload() {
        let err = BackendError::InvalidResponse {
            message: "expected value at line 1".to_string(),
            raw_response: Some("not json".to_string()),
        };
        let text = err.to_string();
        assert!(text.contains("expected value"));
        assert!(!text.contains("not json"));
    }
}
