//! Built-in tool-definition units
//!
//! Startup order is the order of [`MANIFEST`]; add new units here.

pub mod chart;
pub mod renewable_transport;

use super::registry::ToolUnit;

pub use chart::{Plot, PlotPoint};
pub use renewable_transport::RenewableTransportCostEstimator;

pub const MANIFEST: &[ToolUnit] = &[renewable_transport::tool_config];
