//! Chart payloads shared by tools that return visualizations

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One bar/point of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlotPoint {
    pub label: String,
    pub value: f64,
}

/// Chart description rendered by the client UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    /// Chart kind, e.g. `barChart`
    pub chart_type: String,
    pub title: String,
    pub data: Vec<PlotPoint>,
    /// Short narrative summary of what the chart shows
    pub explanation: String,
}
