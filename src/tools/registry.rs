//! Tool registry
//!
//! Process-wide table from tool name to descriptor. It is assembled once at
//! startup from an explicit manifest of tool-definition units and is shared
//! read-only afterwards, so lookups need no locking.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::catalog;
use super::descriptor::{ToolDescriptor, ToolMap};
use super::error::{RegistryError, UnknownTool};

/// A tool-definition unit: produces the descriptors it exports
pub type ToolUnit = fn() -> Result<ToolMap, RegistryError>;

/// Registry of all available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: ToolMap,
}

impl ToolRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry by merging every unit in manifest order
    ///
    /// The first unit that fails aborts the build.
    pub fn from_manifest(units: &[ToolUnit]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for unit in units {
            registry.register(unit()?);
        }
        info!(tools = registry.len(), "Tool registry ready");
        Ok(registry)
    }

    /// Registry with every tool shipped in this crate
    pub fn with_builtin_tools() -> Result<Self, RegistryError> {
        Self::from_manifest(catalog::MANIFEST)
    }

    /// Merges descriptors into the table
    ///
    /// A name that is already registered is overwritten by the new
    /// descriptor.
    pub fn register(&mut self, descriptors: ToolMap) {
        for (name, descriptor) in descriptors {
            if self.tools.contains_key(&name) {
                warn!(tool = %name, "Tool registered twice; keeping the later definition");
            } else {
                debug!(tool = %name, "Registered tool");
            }
            self.tools.insert(name, descriptor);
        }
    }

    /// Registers a single descriptor under its own name
    pub fn register_tool(&mut self, descriptor: Arc<dyn ToolDescriptor>) {
        let mut map = ToolMap::new();
        map.insert(descriptor.name().to_string(), descriptor);
        self.register(map);
    }

    /// Get a tool by name
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn ToolDescriptor>, UnknownTool> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| UnknownTool(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All registered tool names, sorted
    pub fn names(&self) -> BTreeSet<String> {
        self.tools.keys().cloned().collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
