//! Output formatting for the CLI
//!
//! JSON output mirrors the HTTP bodies, so scripts can switch between
//! `toolgate invoke` and the server without changing their parsing.

use anyhow::{Context, Result};
use serde_json::json;

use crate::dispatch::{DispatchError, Invocation, OptionsView};
use crate::server::ApiError;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a successful invocation
    pub fn format_invocation(&self, invocation: &Invocation) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(invocation)
                .context("Failed to serialize invocation result to JSON"),
            OutputFormat::Human => {
                let body = serde_json::to_string_pretty(&invocation.response)
                    .context("Failed to serialize tool response")?;
                Ok(format!(
                    "\u{2713} {}\n{}\n\n{}\n",
                    invocation.tool, RULE, body
                ))
            }
        }
    }

    /// Formats the declared options of every listed tool
    pub fn format_tools(&self, tools: &[OptionsView]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&json!({ "tools": tools }))
                .context("Failed to serialize tools to JSON"),
            OutputFormat::Human => Ok(self.format_tools_human(tools)),
        }
    }

    /// Formats one tool's options, shaped like the options HTTP route
    pub fn format_tool_options(&self, view: &OptionsView) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(view)
                .context("Failed to serialize tool options to JSON"),
            OutputFormat::Human => Ok(self.format_tools_human(std::slice::from_ref(view))),
        }
    }

    /// Formats a failed invocation
    ///
    /// JSON output is the `{"detail": ...}` body the server would return.
    pub fn format_error(&self, error: &DispatchError) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let api_error = ApiError::from(error.clone());
                let body = json!({ "detail": api_error.detail() });
                serde_json::to_string_pretty(&body).context("Failed to serialize error to JSON")
            }
            OutputFormat::Human => Ok(self.format_error_human(error)),
        }
    }

    fn format_tools_human(&self, tools: &[OptionsView]) -> String {
        let mut output = String::new();
        output.push_str(&format!("Registered Tools ({})\n{}\n", tools.len(), RULE));

        for view in tools {
            output.push_str(&format!("\n{}\n", view.tool));
            if view.options.is_empty() {
                output.push_str("\u{2514}\u{2500} (no options)\n");
                continue;
            }
            let count = view.options.len();
            for (i, (field, values)) in view.options.iter().enumerate() {
                let connector = if i == count - 1 { "\u{2514}" } else { "\u{251C}" };
                output.push_str(&format!(
                    "{}\u{2500} {}: {}\n",
                    connector,
                    field,
                    values.join(", ")
                ));
            }
        }

        output
    }

    fn format_error_human(&self, error: &DispatchError) -> String {
        let mut output = String::new();

        match error {
            DispatchError::Validation(errors) => {
                output.push_str(&format!(
                    "\u{2717} Invalid input ({} error{})\n",
                    errors.len(),
                    if errors.len() == 1 { "" } else { "s" }
                ));
                for field in errors.errors() {
                    output.push_str(&format!("  - {}: {}\n", field.path(), field.msg));
                }
            }
            other => {
                output.push_str(&format!("\u{2717} {}\n", other));
            }
        }

        output
    }
}
