//! toolgate - schema-validated tool router for LLM structured completions
//!
//! A caller names a *tool* and sends a JSON payload. The tool's input schema
//! validates the payload, the tool turns it into a prompt, and the prompt is
//! sent to an LLM provider together with the tool's output schema so the
//! model has to answer with a matching JSON object.
//!
//! # Core Concepts
//!
//! - **Tools**: typed [`tools::ToolSpec`] implementations wrapped in
//!   [`tools::Tool`], which compiles their schemas once
//! - **Registry**: name to descriptor table built from an explicit manifest at
//!   startup and read-only afterwards
//! - **Dispatcher**: lookup, validation, prompt construction, completion call
//!   and response shaping for one invocation
//! - **Completion gateway**: [`llm::LLMClient`] with a genai-backed client and
//!   a mock for tests
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use toolgate::{ToolDispatcher, ToolRegistry, ToolgateConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ToolgateConfig::from_env()?;
//! let registry = Arc::new(ToolRegistry::with_builtin_tools()?);
//! let dispatcher = ToolDispatcher::new(registry, config.create_client(), config.model.clone());
//!
//! let result = dispatcher
//!     .invoke(
//!         "renewable-transport-cost-estimator",
//!         json!({"routeDistance": 120, "vehicleType": "electricVehicle"}),
//!     )
//!     .await?;
//! println!("{}", result.response);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod llm;
pub mod server;
pub mod tools;
pub mod util;

pub use config::{ConfigError, ToolgateConfig};
pub use dispatch::{DispatchError, Invocation, OptionsView, ToolDispatcher};
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient};
pub use server::{router, ApiError, Server};
pub use tools::{Tool, ToolDescriptor, ToolRegistry, ToolSpec, ValidationErrors};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
