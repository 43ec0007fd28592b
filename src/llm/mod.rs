//! Completion gateway
//!
//! A trait-based abstraction over the external structured-completion service,
//! so the GenAI-backed client and the test mock can be used interchangeably.

mod client;
mod error;
mod genai;
mod mock;
mod types;

pub use ::genai::adapter::AdapterKind;
pub use client::LLMClient;
pub use error::BackendError;
pub use self::genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use types::{ChatMessage, CompletionRequest, CompletionResponse, MessageRole, ResponseFormat};
