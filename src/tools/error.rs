use thiserror::Error;

/// Errors raised while building the registry at startup
///
/// Any of these aborts startup; a partially populated registry is never served.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Tool name is empty or contains characters that cannot appear in a route
    #[error("Invalid tool name '{0}': use lowercase letters, digits, '-' or '_'")]
    InvalidName(String),

    /// A schema could not be generated or compiled
    #[error("Schema error in tool '{tool}': {message}")]
    Schema { tool: String, message: String },
}

/// Errors raised by a tool while handling one invocation
#[derive(Debug, Error)]
pub enum ToolError {
    /// The prompt builder failed
    #[error("Failed to build prompt: {0}")]
    PromptBuild(String),

    /// The completion does not match the tool's output type
    #[error("Response does not match output schema: {0}")]
    ResponseMismatch(String),

    /// A validated input produced by another tool was handed to this one
    #[error("Validated input does not belong to tool '{0}'")]
    InputMismatch(String),
}

/// Lookup of a name that is not registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid tool name: {0}")]
pub struct UnknownTool(pub String);
