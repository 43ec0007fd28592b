//! Shared helpers for integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use toolgate::llm::MockLLMClient;
use toolgate::{ToolDispatcher, ToolRegistry};

pub const RENEWABLE_TOOL: &str = "renewable-transport-cost-estimator";

pub fn valid_input() -> Value {
    json!({"routeDistance": 120, "vehicleType": "electricVehicle"})
}

/// A completion that satisfies the renewable estimator's output schema
pub fn renewable_results() -> Value {
    json!({
        "estimatedTotalCost": 19.2,
        "vehicleCostEstimates": [
            {
                "vehicleName": "Electric Vehicle",
                "energySource": "Electricity",
                "costEstimate": 19.2,
                "costPerUnit": "$0.16 per kWh",
                "efficiency": "1 kWh per mile",
                "environmentalImpact": "No tailpipe emissions"
            },
            {
                "vehicleName": "Hydrogen Vehicle",
                "energySource": "Hydrogen",
                "costEstimate": 64.8,
                "costPerUnit": "$5.40 per kg",
                "efficiency": "0.1 kg per mile",
                "environmentalImpact": "Water vapour only"
            }
        ],
        "emissionReductions": [
            {"vehicleName": "Electric Vehicle", "reduction": "100% vs diesel"},
            {"vehicleName": "Hydrogen Vehicle", "reduction": "90% vs diesel"}
        ],
        "recommendedVehicle": "Electric Vehicle",
        "vehicleComparisonAnalysis": {
            "chartType": "barChart",
            "title": "Route cost by vehicle type",
            "data": [
                {"label": "Electric Vehicle", "value": 19.2},
                {"label": "Hydrogen Vehicle", "value": 64.8}
            ],
            "explanation": "Electric vehicles have the lowest energy cost per mile."
        },
        "environmentalIncentives": ["Federal EV tax credit"]
    })
}

pub fn dispatcher(client: Arc<MockLLMClient>) -> ToolDispatcher {
    let registry = ToolRegistry::with_builtin_tools().unwrap();
    ToolDispatcher::new(Arc::new(registry), client, "gpt-4o-mini")
}
