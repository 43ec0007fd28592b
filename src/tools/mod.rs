//! Tool definitions and the registry that holds them

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod schema;

pub use descriptor::{Tool, ToolDescriptor, ToolMap, ToolOptions, ToolSpec, ValidatedInput};
pub use error::{RegistryError, ToolError, UnknownTool};
pub use registry::{ToolRegistry, ToolUnit};
pub use schema::{FieldError, ValidationErrors};
