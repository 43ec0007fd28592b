//! Subcommand handlers
//!
//! Each handler returns the process exit code: `0` on success, `1` when the
//! tool or server failed, `2` for bad configuration or unusable input.

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::commands::{InvokeArgs, ProviderArgs, ServeArgs, ToolsArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::ToolgateConfig;
use crate::dispatch::{OptionsView, ToolDispatcher};
use crate::llm::LLMClient;
use crate::server::Server;
use crate::tools::ToolRegistry;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

pub async fn handle_serve(args: &ServeArgs) -> i32 {
    let mut config = match load_config(&args.provider) {
        Ok(config) => config,
        Err(code) => return code,
    };
    if let Some(ref host) = args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return EXIT_USAGE;
    }

    match serve(&config).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("Server failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

async fn serve(config: &ToolgateConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let dispatcher = build_dispatcher(config, config.create_client())?;
    info!(
        provider = ?config.provider,
        model = %config.model,
        tools = dispatcher.registry().len(),
        "Starting server"
    );

    let server = Server::bind(addr, dispatcher)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        })
        .await
        .context("HTTP server error")
}

pub async fn handle_invoke(args: &InvokeArgs) -> i32 {
    let config = match load_config(&args.provider) {
        Ok(config) => config,
        Err(code) => return code,
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return EXIT_USAGE;
    }

    let dispatcher = match build_dispatcher(&config, config.create_client()) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    run_invoke(&dispatcher, args).await
}

/// Runs one invocation through an existing dispatcher and prints the outcome
pub async fn run_invoke(dispatcher: &ToolDispatcher, args: &InvokeArgs) -> i32 {
    let input = match read_input(args) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_USAGE;
        }
    };

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    debug!(tool = %args.tool, "Invoking tool from CLI");

    match dispatcher.invoke(&args.tool, input).await {
        Ok(invocation) => match formatter.format_invocation(&invocation) {
            Ok(output) => {
                println!("{}", output);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                EXIT_FAILURE
            }
        },
        Err(err) => {
            match formatter.format_error(&err) {
                Ok(output) => eprintln!("{}", output),
                Err(_) => eprintln!("Error: {}", err),
            }
            EXIT_FAILURE
        }
    }
}

pub async fn handle_tools(args: &ToolsArgs) -> i32 {
    let registry = match ToolRegistry::with_builtin_tools() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };

    let views = match collect_options(&registry, args.tool.as_deref()) {
        Ok(views) => views,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_USAGE;
        }
    };

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    let formatted = match (&args.tool, views.as_slice()) {
        (Some(_), [view]) => formatter.format_tool_options(view),
        _ => formatter.format_tools(&views),
    };
    match formatted {
        Ok(output) => {
            println!("{}", output.trim_end());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

fn collect_options(
    registry: &ToolRegistry,
    only: Option<&str>,
) -> Result<Vec<OptionsView>, crate::tools::UnknownTool> {
    let names: Vec<String> = match only {
        Some(name) => vec![registry.lookup(name)?.name().to_string()],
        None => registry.names().into_iter().collect(),
    };

    names
        .into_iter()
        .map(|name| {
            let descriptor = registry.lookup(&name)?;
            Ok(OptionsView {
                tool: name,
                options: descriptor.options().clone(),
            })
        })
        .collect()
}

/// Configuration from the environment with command-line overrides applied
fn load_config(overrides: &ProviderArgs) -> Result<ToolgateConfig, i32> {
    let mut config = ToolgateConfig::from_env().map_err(|e| {
        eprintln!("Error: {}", e);
        EXIT_USAGE
    })?;

    if let Some(provider) = overrides.provider {
        config.provider = provider;
    }
    if let Some(ref model) = overrides.model {
        config.model = model.clone();
    }
    if let Some(timeout) = overrides.timeout {
        config.request_timeout_secs = timeout;
    }

    debug!("{}", config);
    Ok(config)
}

fn build_dispatcher(
    config: &ToolgateConfig,
    client: Arc<dyn LLMClient>,
) -> Result<Arc<ToolDispatcher>> {
    let registry = ToolRegistry::with_builtin_tools().context("Failed to build tool registry")?;
    Ok(Arc::new(ToolDispatcher::new(
        Arc::new(registry),
        client,
        config.model.clone(),
    )))
}

fn read_input(args: &InvokeArgs) -> Result<Value> {
    let (raw, source) = match (&args.input, &args.input_file) {
        (Some(inline), _) => (inline.clone(), "--input".to_string()),
        (None, Some(path)) => (
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            path.display().to_string(),
        ),
        (None, None) => anyhow::bail!("Provide --input or --input-file"),
    };

    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use crate::llm::{MockLLMClient, MockResponse};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TOOL: &str = "renewable-transport-cost-estimator";

    fn invoke_args(input: Option<&str>) -> InvokeArgs {
        InvokeArgs {
            tool: TOOL.to_string(),
            input: input.map(str::to_string),
            input_file: None,
            format: OutputFormatArg::Json,
            provider: ProviderArgs::default(),
        }
    }

    fn dispatcher(client: Arc<MockLLMClient>) -> ToolDispatcher {
        ToolDispatcher::new(
            Arc::new(ToolRegistry::with_builtin_tools().unwrap()),
            client,
            "mock-model",
        )
    }

    #[test]
    fn test_read_inline_input() {
        let args = invoke_args(Some(r#"{"routeDistance": 10, "vehicleType": "electricVehicle"}"#));
        let value = read_input(&args).unwrap();
        assert_eq!(value["routeDistance"], 10);
    }

    #[test]
    fn test_read_input_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"routeDistance": 5, "vehicleType": "biofuelVehicle"}}"#).unwrap();

        let mut args = invoke_args(None);
        args.input_file = Some(file.path().to_path_buf());

        let value = read_input(&args).unwrap();
        assert_eq!(value["vehicleType"], "biofuelVehicle");
    }

    #[test]
    fn test_read_input_rejects_invalid_json() {
        let args = invoke_args(Some("{not json"));
        let err = read_input(&args).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_collect_options() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();

        let all = collect_options(&registry, None).unwrap();
        assert!(all.iter().any(|view| view.tool == TOOL));

        let single = collect_options(&registry, Some(TOOL)).unwrap();
        assert_eq!(single.len(), 1);
        assert!(single[0].options.contains_key("vehicleType"));

        assert!(collect_options(&registry, Some("nope")).is_err());
    }

    #[tokio::test]
    async fn test_run_invoke_validation_failure_exit_code() {
        let client = Arc::new(MockLLMClient::new());
        let dispatcher = dispatcher(client.clone());
        let args = invoke_args(Some(r#"{"routeDistance": "far", "vehicleType": "electricVehicle"}"#));

        assert_eq!(run_invoke(&dispatcher, &args).await, EXIT_FAILURE);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_run_invoke_bad_json_is_usage_error() {
        let dispatcher = dispatcher(Arc::new(MockLLMClient::new()));
        let args = invoke_args(Some("]"));

        assert_eq!(run_invoke(&dispatcher, &args).await, EXIT_USAGE);
    }

    #[tokio::test]
    async fn test_run_invoke_success() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::json(json!({
            "estimatedTotalCost": 19.2,
            "vehicleCostEstimates": [{
                "vehicleName": "Electric Vehicle",
                "energySource": "Electricity",
                "costEstimate": 19.2,
                "costPerUnit": "$0.16 per kWh",
                "efficiency": "1 kWh per mile",
                "environmentalImpact": "Zero tailpipe emissions"
            }],
            "emissionReductions": null,
            "recommendedVehicle": "Electric Vehicle",
            "vehicleComparisonAnalysis": {
                "chartType": "barChart",
                "title": "Cost per route",
                "data": [{"label": "Electric Vehicle", "value": 19.2}],
                "explanation": "Electric is cheapest."
            },
            "environmentalIncentives": ["Federal EV tax credit"]
        })));
        let dispatcher = dispatcher(client);
        let args = invoke_args(Some(r#"{"routeDistance": 120, "vehicleType": "electricVehicle"}"#));

        assert_eq!(run_invoke(&dispatcher, &args).await, EXIT_SUCCESS);
    }
}
