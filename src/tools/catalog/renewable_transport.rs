//! Renewable Transport Cost Estimator
//!
//! Compares the cost of running a route with electric, hydrogen and biofuel
//! vehicles, using the reference price table bundled in
//! `data/renewable_cost.json`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::chart::Plot;
use crate::llm::ChatMessage;
use crate::tools::descriptor::{Tool, ToolMap, ToolOptions, ToolSpec};
use crate::tools::error::{RegistryError, ToolError};

pub const TOOL_NAME: &str = "renewable-transport-cost-estimator";

const REFERENCE_DATA: &str = include_str!("../../../data/renewable_cost.json");

const VEHICLE_TYPES: [&str; 3] = ["Electric Vehicle", "Hydrogen Vehicle", "Biofuel Vehicle"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewableTransportCostEstimatorInput {
    /// Route distance in miles
    pub route_distance: f64,
    /// Renewable-powered vehicle type, e.g. `electricVehicle`
    pub vehicle_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCostEstimate {
    pub vehicle_name: String,
    pub energy_source: String,
    /// Total cost for the whole route
    pub cost_estimate: f64,
    /// Price per energy unit, e.g. "$0.16 per kWh"
    pub cost_per_unit: String,
    /// Energy use per mile
    pub efficiency: String,
    pub environmental_impact: String,
}

/// Emission reduction of one vehicle type against a diesel baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmissionReduction {
    pub vehicle_name: String,
    /// e.g. "100% vs diesel"
    pub reduction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewableTransportCostEstimatorResults {
    pub estimated_total_cost: f64,
    pub vehicle_cost_estimates: Vec<VehicleCostEstimate>,
    pub emission_reductions: Option<Vec<EmissionReduction>>,
    pub recommended_vehicle: String,
    pub vehicle_comparison_analysis: Plot,
    pub environmental_incentives: Vec<String>,
}

const SYSTEM_INSTRUCTIONS: &str = r#"You are the assistant behind the Renewable Transport Cost Estimator, a shipping tool.
Calculate and compare what a route costs when it is driven with renewable-powered vehicles (Electric, Hydrogen, Biofuel), based on the user's input.

Reference data (prices, efficiencies, emissions, incentives):
"#;

const OUTPUT_INSTRUCTIONS: &str = r#"
Output fields:

- `estimatedTotalCost` (number): total cost of the route with the requested vehicle type.
- `vehicleCostEstimates` (list of objects): one entry per vehicle type with its energy source, cost per unit, efficiency per mile, total route cost and environmental impact, so the user can compare options.
- `emissionReductions` (list of objects): one `{vehicleName, reduction}` entry per vehicle type, giving its emission reduction compared to a diesel baseline.
- `recommendedVehicle` (string): the vehicle type best suited to the route distance.
- `vehicleComparisonAnalysis` (chart): a "barChart" comparing cost efficiency across vehicle types, with a short explanation of the cost benefits of each.
- `environmentalIncentives` (list of strings): incentives, subsidies or grants that apply to the requested vehicle type.

Only use "barChart" as the chart type."#;

/// Renewable transport cost comparison tool
#[derive(Debug, Default, Clone, Copy)]
pub struct RenewableTransportCostEstimator;

impl ToolSpec for RenewableTransportCostEstimator {
    type Input = RenewableTransportCostEstimatorInput;
    type Output = RenewableTransportCostEstimatorResults;

    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn build_prompt(
        &self,
        input: &RenewableTransportCostEstimatorInput,
    ) -> Result<Vec<ChatMessage>, ToolError> {
        let knowledge: Value = serde_json::from_str(REFERENCE_DATA)
            .map_err(|e| ToolError::PromptBuild(format!("reference data is not valid JSON: {}", e)))?;
        let knowledge = serde_json::to_string_pretty(&knowledge)
            .map_err(|e| ToolError::PromptBuild(e.to_string()))?;
        let parameters = serde_json::to_string_pretty(input)
            .map_err(|e| ToolError::PromptBuild(e.to_string()))?;

        let system_prompt = format!("{}{}\n{}", SYSTEM_INSTRUCTIONS, knowledge, OUTPUT_INSTRUCTIONS);
        let user_prompt = format!(
            "I need a cost analysis for renewable-powered transport based on the following input:\n{}",
            parameters
        );

        Ok(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ])
    }

    fn options(&self) -> ToolOptions {
        ToolOptions::from([(
            "vehicleType".to_string(),
            VEHICLE_TYPES.iter().map(|v| v.to_string()).collect(),
        )])
    }
}

/// Tool-definition unit export
pub fn tool_config() -> Result<ToolMap, RegistryError> {
    Ok(Tool::new(RenewableTransportCostEstimator)?.into_map())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;
    use crate::tools::descriptor::ToolDescriptor;
    use crate::tools::schema::open_objects;
    use serde_json::json;

    fn input() -> RenewableTransportCostEstimatorInput {
        RenewableTransportCostEstimatorInput {
            route_distance: 120.0,
            vehicle_type: "electricVehicle".to_string(),
        }
    }

    #[test]
    fn test_reference_data_parses() {
        let data: Value = serde_json::from_str(REFERENCE_DATA).unwrap();
        assert_eq!(data["vehicles"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_prompt_has_system_then_user() {
        let messages = RenewableTransportCostEstimator.build_prompt(&input()).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
    }

    #[test]
    fn test_system_prompt_embeds_reference_data() {
        let messages = RenewableTransportCostEstimator.build_prompt(&input()).unwrap();
        let system = &messages[0].content;

        assert!(system.contains("Renewable Transport Cost Estimator"));
        assert!(system.contains("\"costPerUnit\": 0.16"));
        assert!(system.contains("barChart"));
    }

    #[test]
    fn test_user_prompt_embeds_input() {
        let messages = RenewableTransportCostEstimator.build_prompt(&input()).unwrap();
        let user = &messages[1].content;

        assert!(user.contains("\"routeDistance\": 120.0"));
        assert!(user.contains("\"vehicleType\": \"electricVehicle\""));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let first = RenewableTransportCostEstimator.build_prompt(&input()).unwrap();
        let second = RenewableTransportCostEstimator.build_prompt(&input()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_options() {
        let options = RenewableTransportCostEstimator.options();
        assert_eq!(
            options["vehicleType"],
            vec!["Electric Vehicle", "Hydrogen Vehicle", "Biofuel Vehicle"]
        );
    }

    #[test]
    fn test_tool_config_exports_one_tool() {
        let map = tool_config().unwrap();
        let tool = &map[TOOL_NAME];

        assert_eq!(tool.name(), TOOL_NAME);
        assert_eq!(
            tool.response_format().name,
            "RenewableTransportCostEstimatorResults"
        );
        assert_eq!(
            tool.input_schema()["required"],
            json!(["routeDistance", "vehicleType"])
        );
    }

    #[test]
    fn test_output_schema_is_strict() {
        let map = tool_config().unwrap();
        let schema = &map[TOOL_NAME].response_format().schema;

        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(
            schema["definitions"]["VehicleCostEstimate"]["additionalProperties"],
            json!(false)
        );
        assert_eq!(
            schema["definitions"]["Plot"]["required"],
            json!(["chartType", "data", "explanation", "title"])
        );
    }

    #[test]
    fn test_output_schema_has_no_open_objects() {
        let map = tool_config().unwrap();
        let schema = &map[TOOL_NAME].response_format().schema;

        assert!(open_objects(schema).is_empty());
        assert_eq!(
            schema["definitions"]["EmissionReduction"]["required"],
            json!(["reduction", "vehicleName"])
        );
    }

    #[test]
    fn test_emission_reductions_are_entries() {
        let map = tool_config().unwrap();
        let tool = &map[TOOL_NAME];
        let mut results = json!({
            "estimatedTotalCost": 19.2,
            "vehicleCostEstimates": [],
            "emissionReductions": [{"vehicleName": "Electric Vehicle", "reduction": "100% vs diesel"}],
            "recommendedVehicle": "Electric Vehicle",
            "vehicleComparisonAnalysis": {
                "chartType": "barChart",
                "title": "Cost",
                "data": [],
                "explanation": "Electric is cheapest."
            },
            "environmentalIncentives": []
        });
        assert!(tool.shape_response(results.clone()).is_ok());

        results["emissionReductions"] = json!({"Electric Vehicle": "100% vs diesel"});
        assert!(tool.shape_response(results).is_err());
    }
}
