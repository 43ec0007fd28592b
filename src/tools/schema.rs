//! Schema generation and input validation
//!
//! Input and output contracts are plain Rust types deriving `JsonSchema`.
//! Their generated schemas serve two purposes: raw request payloads are
//! validated against the input schema before being deserialized, and the
//! output schema is rewritten into the strict form that structured-output
//! providers require.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{JSONSchema, ValidationError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::error::RegistryError;

/// Keywords that strict structured-output modes reject
const UNSUPPORTED_STRICT_KEYWORDS: &[&str] = &["$schema", "format", "minimum", "maximum"];

/// One field-level validation problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Error category: `missing`, `type_error` or `value_error`
    #[serde(rename = "type")]
    pub kind: String,
    /// Path to the offending field, outermost first
    pub loc: Vec<String>,
    /// Human readable description of the expected constraint
    pub msg: String,
    /// The value that was received at `loc`
    pub input: Value,
}

impl FieldError {
    fn from_jsonschema(error: ValidationError<'_>) -> Self {
        let mut loc: Vec<String> = error
            .instance_path
            .to_string()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        let input = error.instance.clone().into_owned();

        match &error.kind {
            ValidationErrorKind::Required { property } => {
                loc.push(
                    property
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| property.to_string()),
                );
                Self {
                    kind: "missing".to_string(),
                    loc,
                    msg: "Field required".to_string(),
                    input,
                }
            }
            ValidationErrorKind::Type { .. } => Self {
                kind: "type_error".to_string(),
                loc,
                msg: error.to_string(),
                input,
            },
            _ => Self {
                kind: "value_error".to_string(),
                loc,
                msg: error.to_string(),
                input,
            },
        }
    }

    /// Dotted form of `loc`, or `<root>` for whole-payload errors
    pub fn path(&self) -> String {
        if self.loc.is_empty() {
            "<root>".to_string()
        } else {
            self.loc.join(".")
        }
    }
}

/// All problems found in one payload, in the order they were detected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    /// Single error that applies to the payload as a whole
    pub fn whole_payload(msg: impl Into<String>, input: Value) -> Self {
        Self(vec![FieldError {
            kind: "value_error".to_string(),
            loc: Vec::new(),
            msg: msg.into(),
            input,
        }])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any error points at the given top-level field
    pub fn mentions(&self, field: &str) -> bool {
        self.0
            .iter()
            .any(|error| error.loc.first().map(String::as_str) == Some(field))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.path(), error.msg))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Compiled validator for a tool's input schema
pub struct InputValidator {
    schema: Value,
    compiled: JSONSchema,
}

impl InputValidator {
    pub fn compile(tool: &str, schema: Value) -> Result<Self, RegistryError> {
        let compiled = JSONSchema::compile(&schema).map_err(|e| RegistryError::Schema {
            tool: tool.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { schema, compiled })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Checks `raw` against the schema, collecting every violation
    pub fn validate(&self, raw: &Value) -> Result<(), ValidationErrors> {
        match self.compiled.validate(raw) {
            Ok(()) => Ok(()),
            Err(errors) => Err(ValidationErrors(
                errors.map(FieldError::from_jsonschema).collect(),
            )),
        }
    }
}

impl fmt::Debug for InputValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputValidator")
            .field("schema", &self.schema)
            .finish()
    }
}

/// Generates the draft-07 JSON Schema for `T`
pub fn schema_of<T: JsonSchema>(tool: &str) -> Result<Value, RegistryError> {
    let root = schemars::schema_for!(T);
    serde_json::to_value(root).map_err(|e| RegistryError::Schema {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Rewrites a generated schema into the strict structured-output dialect
///
/// Every object with declared properties gets `additionalProperties: false`
/// and lists all of its properties as required (optional fields stay
/// nullable). Keywords the strict dialect rejects are dropped. Free-form maps
/// (objects without `properties`) cannot be closed and are left as they are;
/// [`open_objects`] reports them.
pub fn strict_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                if UNSUPPORTED_STRICT_KEYWORDS.contains(&key.as_str()) {
                    continue;
                }
                let rewritten = match key.as_str() {
                    "properties" | "definitions" | "$defs" => rewrite_entries(value),
                    _ => strict_schema(value),
                };
                out.insert(key.clone(), rewritten);
            }

            if let Some(Value::Object(properties)) = out.get("properties") {
                let required: Vec<Value> = properties
                    .keys()
                    .map(|name| Value::String(name.clone()))
                    .collect();
                out.insert("required".to_string(), Value::Array(required));
                out.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(strict_schema).collect()),
        other => other.clone(),
    }
}

/// `properties`/`definitions` map names to schemas; the names themselves are
/// not keywords and must survive even when they collide with one
fn rewrite_entries(value: &Value) -> Value {
    match value {
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(name, schema)| (name.clone(), strict_schema(schema)))
                .collect(),
        ),
        other => strict_schema(other),
    }
}

/// JSON pointers of object schemas that still accept undeclared keys
///
/// `type` may be a plain `"object"` or a list containing it, as generated for
/// nullable fields.
pub fn open_objects(schema: &Value) -> Vec<String> {
    let mut found = Vec::new();
    collect_open_objects(schema, String::new(), &mut found);
    found
}

fn collect_open_objects(schema: &Value, pointer: String, found: &mut Vec<String>) {
    match schema {
        Value::Object(map) => {
            let is_object = match map.get("type") {
                Some(Value::String(kind)) => kind == "object",
                Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("object")),
                _ => false,
            };
            if is_object && map.get("additionalProperties") != Some(&Value::Bool(false)) {
                found.push(if pointer.is_empty() { "/".to_string() } else { pointer.clone() });
            }
            for (key, value) in map {
                collect_open_objects(value, format!("{}/{}", pointer, key), found);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_open_objects(item, format!("{}/{}", pointer, i), found);
            }
        }
        _ => {}
    }
}
