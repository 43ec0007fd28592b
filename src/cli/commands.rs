use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

use crate::config::parse_provider;

/// Schema-validated tool router in front of LLM structured completions
#[derive(Parser, Debug)]
#[command(
    name = "toolgate",
    about = "Schema-validated tool router in front of LLM structured completions",
    version,
    author,
    long_about = "toolgate exposes named tools over HTTP. Each tool validates its JSON input, \
                  turns it into a prompt and asks an LLM provider for a response that matches \
                  the tool's output schema. Providers are reached through genai \
                  (OpenAI, Anthropic, Gemini, Ollama, Groq, xAI, ...)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Start the HTTP server",
        long_about = "Serves every registered tool over HTTP until interrupted.\n\n\
                      Examples:\n  \
                      toolgate serve\n  \
                      toolgate serve --port 9000\n  \
                      toolgate serve --provider ollama --model llama3.1"
    )]
    Serve(ServeArgs),

    #[command(
        about = "Run one tool invocation",
        long_about = "Validates the input, calls the provider once and prints the result.\n\n\
                      Examples:\n  \
                      toolgate invoke renewable-transport-cost-estimator \\\n    \
                      --input '{\"routeDistance\": 120, \"vehicleType\": \"electricVehicle\"}'\n  \
                      toolgate invoke renewable-transport-cost-estimator --input-file route.json"
    )]
    Invoke(InvokeArgs),

    #[command(
        about = "List registered tools and their options",
        long_about = "Prints every registered tool name with its declared options.\n\n\
                      Examples:\n  \
                      toolgate tools\n  \
                      toolgate tools --tool renewable-transport-cost-estimator --format json"
    )]
    Tools(ToolsArgs),
}

/// Provider settings shared by commands that reach the LLM
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    #[arg(
        short = 'p',
        long,
        value_parser = parse_adapter_kind,
        help = "LLM provider (overrides TOOLGATE_PROVIDER)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model identifier (overrides TOOLGATE_MODEL)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Completion timeout in seconds (overrides TOOLGATE_REQUEST_TIMEOUT)"
    )]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, value_name = "ADDR", help = "Bind address (overrides TOOLGATE_HOST)")]
    pub host: Option<String>,

    #[arg(long, value_name = "PORT", help = "Port (overrides TOOLGATE_PORT)")]
    pub port: Option<u16>,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "input_file"])))]
pub struct InvokeArgs {
    #[arg(value_name = "TOOL", help = "Registered tool name")]
    pub tool: String,

    #[arg(short = 'i', long, value_name = "JSON", help = "Tool input as a JSON string")]
    pub input: Option<String>,

    #[arg(long, value_name = "FILE", help = "Read tool input from a JSON file")]
    pub input_file: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ToolsArgs {
    #[arg(short = 't', long, value_name = "TOOL", help = "Show a single tool")]
    pub tool: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    parse_provider(s).map_err(|e| e.to_string())
}
