//! Completion request/response types
//!
//! These types describe a single structured-completion exchange independent of
//! any specific provider implementation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,
    /// User message
    User,
    /// Assistant (LLM) response
    Assistant,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content of the message
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Structured-output constraint sent along with a completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Schema name reported to the provider
    pub name: String,
    /// JSON Schema the completion must conform to
    pub schema: Value,
}

impl ResponseFormat {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Request to send to the completion service
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation messages, in order
    pub messages: Vec<ChatMessage>,
    /// Schema the structured response must follow
    pub response_format: ResponseFormat,
    /// Model identifier
    pub model: String,
    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f32,
}

impl CompletionRequest {
    /// Creates a request with deterministic sampling
    pub fn new(
        model: impl Into<String>,
        messages: Vec<ChatMessage>,
        response_format: ResponseFormat,
    ) -> Self {
        Self {
            messages,
            response_format,
            model: model.into(),
            temperature: 0.0,
        }
    }

    /// Sets the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Structured response from the completion service
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Parsed structured object
    pub content: Value,
    /// Time taken for the request
    pub response_time: Duration,
}

impl CompletionResponse {
    pub fn new(content: Value, response_time: Duration) -> Self {
        Self {
            content,
            response_time,
        }
    }
}
