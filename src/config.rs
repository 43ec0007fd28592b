//! Configuration management for toolgate
//!
//! Settings come from environment variables with defaults. The binary loads a
//! `.env` file first, so every variable below can also live there.
//!
//! # Environment Variables
//!
//! ## Toolgate Configuration
//! - `TOOLGATE_PROVIDER`: Provider selection (openai|anthropic|gemini|ollama|groq|xai|...) - default: "openai"
//! - `TOOLGATE_MODEL`: Model identifier passed to the provider - default: "gpt-4o-mini"
//! - `TOOLGATE_REQUEST_TIMEOUT`: Completion timeout in seconds - default: "60"
//! - `TOOLGATE_HOST`: HTTP bind address - default: "0.0.0.0"
//! - `TOOLGATE_PORT`: HTTP port - default: "8000"
//! - `TOOLGATE_LOG_LEVEL`: Logging level - default: "info"
//! - `TOOLGATE_API_BASE_URL`: Custom OpenAI-compatible endpoint (optional)
//!
//! ## GenAI Provider Configuration
//! Credentials are read directly by the genai library:
//! - **OpenAI**: `OPENAI_API_KEY`
//! - **Anthropic**: `ANTHROPIC_API_KEY`
//! - **Gemini**: `GEMINI_API_KEY`
//! - **Groq**: `GROQ_API_KEY`
//! - **Ollama**: no key; `TOOLGATE_API_BASE_URL` points at the host
//!
//! # Example
//!
//! ```no_run
//! use toolgate::ToolgateConfig;
//!
//! let config = ToolgateConfig::from_env()?;
//! config.validate()?;
//! let client = config.create_client();
//! # Ok::<(), toolgate::config::ConfigError>(())
//! ```

use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::llm::GenAIClient;

pub const PROVIDER_ENV: &str = "TOOLGATE_PROVIDER";
pub const MODEL_ENV: &str = "TOOLGATE_MODEL";
pub const REQUEST_TIMEOUT_ENV: &str = "TOOLGATE_REQUEST_TIMEOUT";
pub const HOST_ENV: &str = "TOOLGATE_HOST";
pub const PORT_ENV: &str = "TOOLGATE_PORT";
pub const LOG_LEVEL_ENV: &str = "TOOLGATE_LOG_LEVEL";
/// OpenAI-compatible proxy or local host the client talks to instead
pub const API_BASE_URL_ENV: &str = "TOOLGATE_API_BASE_URL";

const DEFAULT_PROVIDER: AdapterKind = AdapterKind::OpenAI;
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid provider name
    #[error("Invalid provider: {0}. Valid options: openai, anthropic, gemini, ollama, groq, xai, deepseek, cohere")]
    InvalidProvider(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Runtime configuration shared by the server and the CLI
#[derive(Debug, Clone)]
pub struct ToolgateConfig {
    /// LLM provider (from genai)
    pub provider: AdapterKind,

    /// Model identifier sent with every completion
    pub model: String,

    /// Completion timeout in seconds
    pub request_timeout_secs: u64,

    /// Custom provider endpoint
    pub api_base_url: Option<String>,

    pub host: String,

    pub port: u16,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ToolgateConfig {
    /// Loads from environment variables, falling back to defaults for
    /// missing or unparsable values
    fn default() -> Self {
        let provider = env::var(PROVIDER_ENV)
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(DEFAULT_PROVIDER);

        let request_timeout_secs = env::var(REQUEST_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let port = env::var(PORT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            provider,
            model: env_or(MODEL_ENV, DEFAULT_MODEL),
            request_timeout_secs,
            api_base_url: non_empty_env(API_BASE_URL_ENV),
            host: env_or(HOST_ENV, DEFAULT_HOST),
            port,
            log_level: env_or(LOG_LEVEL_ENV, DEFAULT_LOG_LEVEL).to_lowercase(),
        }
    }
}

impl ToolgateConfig {
    /// Loads from environment variables, rejecting values that are set but
    /// cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(provider) = non_empty_env(PROVIDER_ENV) {
            config.provider = parse_provider(&provider)?;
        }
        if let Some(timeout) = non_empty_env(REQUEST_TIMEOUT_ENV) {
            config.request_timeout_secs = parse_field(REQUEST_TIMEOUT_ENV, &timeout)?;
        }
        if let Some(port) = non_empty_env(PORT_ENV) {
            config.port = parse_field(PORT_ENV, &port)?;
        }

        Ok(config)
    }

    /// Checks value ranges
    ///
    /// Credentials are checked by genai on the first completion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model identifier cannot be empty".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid host address: {}",
                self.host
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = self
            .host
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::ParseError {
                field: HOST_ENV.to_string(),
                error: e.to_string(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Creates the completion client for the configured provider
    pub fn create_client(&self) -> Arc<GenAIClient> {
        Arc::new(GenAIClient::with_endpoint(
            self.provider,
            self.model.clone(),
            self.request_timeout(),
            self.api_base_url.clone(),
        ))
    }
}

impl fmt::Display for ToolgateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Toolgate Configuration:")?;
        writeln!(f, "  Provider: {:?}", self.provider)?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        if let Some(ref url) = self.api_base_url {
            writeln!(f, "  API Base URL: {}", url)?;
        }
        writeln!(f, "  Listen: {}:{}", self.host, self.port)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

/// Parses a provider name as genai spells it, plus a few common aliases
pub fn parse_provider(s: &str) -> Result<AdapterKind, ConfigError> {
    let lower = s.trim().to_lowercase();
    let canonical = match lower.as_str() {
        "claude" => "anthropic",
        "grok" => "xai",
        other => other,
    };
    AdapterKind::from_lower_str(canonical).ok_or_else(|| ConfigError::InvalidProvider(s.to_string()))
}

fn parse_field<T>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::ParseError {
            field: field.to_string(),
            error: e.to_string(),
        })
}

fn env_or(key: &str, default: &str) -> String {
    non_empty_env(key).unwrap_or_else(|| default.to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clean_env() -> Vec<EnvGuard> {
        [
            PROVIDER_ENV,
            MODEL_ENV,
            REQUEST_TIMEOUT_ENV,
            HOST_ENV,
            PORT_ENV,
            LOG_LEVEL_ENV,
            API_BASE_URL_ENV,
        ]
        .iter()
        .map(|key| EnvGuard::unset(key))
        .collect()
    }

    fn sample() -> ToolgateConfig {
        ToolgateConfig {
            provider: AdapterKind::OpenAI,
            model: "gpt-4o-mini".to_string(),
            request_timeout_secs: 60,
            api_base_url: None,
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clean_env();

        let config = ToolgateConfig::default();

        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.api_base_url.is_none());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _clean = clean_env();
        let _guards = vec![
            EnvGuard::set(PROVIDER_ENV, "anthropic"),
            EnvGuard::set(MODEL_ENV, "claude-3-5-haiku-latest"),
            EnvGuard::set(REQUEST_TIMEOUT_ENV, "30"),
            EnvGuard::set(HOST_ENV, "127.0.0.1"),
            EnvGuard::set(PORT_ENV, "9000"),
            EnvGuard::set(LOG_LEVEL_ENV, "DEBUG"),
            EnvGuard::set(API_BASE_URL_ENV, "http://localhost:8080/v1/"),
        ];

        let config = ToolgateConfig::from_env().unwrap();

        assert_eq!(config.provider, AdapterKind::Anthropic);
        assert_eq!(config.model, "claude-3-5-haiku-latest");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("http://localhost:8080/v1/")
        );
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_provider() {
        let _clean = clean_env();
        let _guard = EnvGuard::set(PROVIDER_ENV, "skynet");

        let result = ToolgateConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidProvider(p)) if p == "skynet"));

        // The lenient loader falls back instead
        assert_eq!(ToolgateConfig::default().provider, AdapterKind::OpenAI);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_port() {
        let _clean = clean_env();
        let _guard = EnvGuard::set(PORT_ENV, "eighty");

        let result = ToolgateConfig::from_env();
        assert!(matches!(result, Err(ConfigError::ParseError { ref field, .. }) if field == PORT_ENV));
    }

    #[test]
    fn test_parse_provider_aliases() {
        assert_eq!(parse_provider("OpenAI").unwrap(), AdapterKind::OpenAI);
        assert_eq!(parse_provider("claude").unwrap(), AdapterKind::Anthropic);
        assert_eq!(parse_provider("ollama").unwrap(), AdapterKind::Ollama);
        assert!(parse_provider("invalid").is_err());
    }

    #[test]
    fn test_configuration_validation_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_configuration_validation_invalid_timeout() {
        let mut config = sample();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_host() {
        let mut config = sample();
        config.host = "not-an-ip".to_string();
        assert!(config.validate().is_err());
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_log_level() {
        let mut config = sample();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_create_client() {
        let client = sample().create_client();
        let debug = format!("{:?}", client);
        assert!(debug.contains("gpt-4o-mini"));
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", sample());
        assert!(display.contains("Toolgate Configuration:"));
        assert!(display.contains("Provider: OpenAI"));
        assert!(display.contains("Listen: 127.0.0.1:8000"));
    }
}
