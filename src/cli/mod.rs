pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, InvokeArgs, ProviderArgs, ServeArgs, ToolsArgs};
pub use output::{OutputFormat, OutputFormatter};
