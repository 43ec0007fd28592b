//! Tool descriptors
//!
//! A tool pairs an input contract, an output contract and a prompt builder.
//! Authors implement [`ToolSpec`] with concrete `Input`/`Output` types, so the
//! compiler guarantees that a prompt builder is always registered together
//! with the output type it was written for. [`Tool`] wraps a `ToolSpec` into the
//! object-safe [`ToolDescriptor`] the registry stores.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::error::{RegistryError, ToolError};
use super::schema::{open_objects, schema_of, strict_schema, InputValidator, ValidationErrors};
use crate::llm::{ChatMessage, ResponseFormat};

/// Display choices per input field; informational only, never enforced
pub type ToolOptions = BTreeMap<String, Vec<String>>;

/// Mapping from tool name to descriptor, as exported by a tool-definition unit
pub type ToolMap = BTreeMap<String, Arc<dyn ToolDescriptor>>;

/// Typed definition of a tool
pub trait ToolSpec: Send + Sync + 'static {
    type Input: DeserializeOwned + Serialize + JsonSchema + Send + Sync + 'static;
    type Output: DeserializeOwned + Serialize + JsonSchema;

    /// Unique registry name, also used in routes
    fn name(&self) -> &'static str;

    /// Builds the ordered conversation for one invocation
    ///
    /// Must not perform I/O beyond reading data bundled with the tool.
    fn build_prompt(&self, input: &Self::Input) -> Result<Vec<ChatMessage>, ToolError>;

    fn options(&self) -> ToolOptions {
        ToolOptions::new()
    }
}

/// Input that passed a tool's schema, in both typed and JSON form
pub struct ValidatedInput {
    json: Value,
    typed: Box<dyn Any + Send + Sync>,
}

impl ValidatedInput {
    fn new<T: Send + Sync + 'static>(json: Value, typed: T) -> Self {
        Self {
            json,
            typed: Box::new(typed),
        }
    }

    /// Normalized JSON form of the input
    pub fn as_json(&self) -> &Value {
        &self.json
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.typed.downcast_ref::<T>()
    }
}

impl fmt::Debug for ValidatedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedInput")
            .field("json", &self.json)
            .finish()
    }
}

/// Object-safe capability set the dispatcher works with
pub trait ToolDescriptor: Send + Sync {
    fn name(&self) -> &str;

    /// JSON Schema of the accepted input
    fn input_schema(&self) -> &Value;

    /// Strict output schema sent to the completion service
    fn response_format(&self) -> &ResponseFormat;

    fn options(&self) -> &ToolOptions;

    fn validate(&self, raw: &Value) -> Result<ValidatedInput, ValidationErrors>;

    fn build_prompt(&self, input: &ValidatedInput) -> Result<Vec<ChatMessage>, ToolError>;

    /// Checks a completion against the output type and returns its normalized form
    fn shape_response(&self, raw: Value) -> Result<Value, ToolError>;
}

impl fmt::Debug for dyn ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name())
            .field("response_format", &self.response_format().name)
            .finish()
    }
}

/// Registered form of a [`ToolSpec`], with schemas generated and compiled once
pub struct Tool<S: ToolSpec> {
    spec: S,
    input: InputValidator,
    response_format: ResponseFormat,
    options: ToolOptions,
}

impl<S: ToolSpec> Tool<S> {
    pub fn new(spec: S) -> Result<Self, RegistryError> {
        let name = spec.name();
        if !is_valid_name(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }

        let input = InputValidator::compile(name, schema_of::<S::Input>(name)?)?;
        let output_schema = strict_schema(&schema_of::<S::Output>(name)?);
        let open = open_objects(&output_schema);
        if !open.is_empty() {
            return Err(RegistryError::Schema {
                tool: name.to_string(),
                message: format!("output schema has open objects at {}", open.join(", ")),
            });
        }
        let response_format = ResponseFormat::new(
            <S::Output as JsonSchema>::schema_name(),
            output_schema,
        );
        let options = spec.options();

        Ok(Self {
            spec,
            input,
            response_format,
            options,
        })
    }

    /// Single-entry mapping, the usual export of a tool-definition unit
    pub fn into_map(self) -> ToolMap {
        let mut map = ToolMap::new();
        map.insert(self.spec.name().to_string(), Arc::new(self) as Arc<dyn ToolDescriptor>);
        map
    }
}

impl<S: ToolSpec> ToolDescriptor for Tool<S> {
    fn name(&self) -> &str {
        self.spec.name()
    }

    fn input_schema(&self) -> &Value {
        self.input.schema()
    }

    fn response_format(&self) -> &ResponseFormat {
        &self.response_format
    }

    fn options(&self) -> &ToolOptions {
        &self.options
    }

    fn validate(&self, raw: &Value) -> Result<ValidatedInput, ValidationErrors> {
        self.input.validate(raw)?;

        let typed: S::Input = serde_json::from_value(raw.clone())
            .map_err(|e| ValidationErrors::whole_payload(e.to_string(), raw.clone()))?;
        let json = serde_json::to_value(&typed)
            .map_err(|e| ValidationErrors::whole_payload(e.to_string(), raw.clone()))?;

        Ok(ValidatedInput::new(json, typed))
    }

    fn build_prompt(&self, input: &ValidatedInput) -> Result<Vec<ChatMessage>, ToolError> {
        let typed = input
            .downcast_ref::<S::Input>()
            .ok_or_else(|| ToolError::InputMismatch(self.spec.name().to_string()))?;
        self.spec.build_prompt(typed)
    }

    fn shape_response(&self, raw: Value) -> Result<Value, ToolError> {
        let parsed: S::Output = serde_json::from_value(raw)
            .map_err(|e| ToolError::ResponseMismatch(e.to_string()))?;
        serde_json::to_value(parsed).map_err(|e| ToolError::ResponseMismatch(e.to_string()))
    }
}

impl<S: ToolSpec> fmt::Debug for Tool<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.spec.name())
            .field("response_format", &self.response_format.name)
            .field("options", &self.options)
            .finish()
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
