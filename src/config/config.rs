//! Configuration structures and loading for the FinPerf gateway

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Catalogue configuration
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Completion capability configuration
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Logging configuration
    pub logging: Option<LoggingConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_HOST.to_string(),
            port: crate::DEFAULT_PORT,
            timeout: 60,
        }
    }
}

/// Catalogue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the endpoint catalogue JSON file
    pub path: String,
    /// Default base URL for endpoints that do not declare one
    pub default_base_url: String,
    /// Downstream invocation timeout in seconds
    pub invoke_timeout: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "finperf_api_specs.json".to_string(),
            default_base_url: "http://localhost:8002".to_string(),
            invoke_timeout: 30,
        }
    }
}

/// Completion capability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Provider (openai, openai-compatible, ollama)
    pub provider: String,
    /// Model name to use
    pub model: String,
    /// API key (if required)
    pub api_key: Option<String>,
    /// Environment variable name for API key (if using env var)
    pub api_key_env: Option<String>,
    /// Base URL for the provider API (if different from default)
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            base_url: None,
            timeout: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable and CLI overrides
    pub fn load<P: AsRef<Path>>(
        path: P,
        host_override: Option<String>,
        port_override: Option<u16>,
        catalog_override: Option<String>,
    ) -> Result<Self> {
        // .env is loaded first so both the file and overrides can reference it
        match dotenvy::dotenv() {
            Ok(_) => tracing::debug!("Loaded environment variables from .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to load .env: {}", e),
        }

        let mut config = if path.as_ref().exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| GatewayError::config(format!("Failed to read config file: {}", e)))?;

            serde_yaml::from_str(&content)
                .map_err(|e| GatewayError::config(format!("Failed to parse config file: {}", e)))?
        } else {
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // Precedence: file < environment < CLI
        config.apply_environment_overrides()?;

        if let Some(host) = host_override {
            config.server.host = host;
        }
        if let Some(port) = port_override {
            config.server.port = port;
        }
        if let Some(catalog) = catalog_override {
            config.catalog.path = catalog;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("GATEWAY_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port_str) = std::env::var("GATEWAY_PORT") {
            if !port_str.is_empty() {
                self.server.port = port_str.parse().map_err(|e| {
                    GatewayError::config(format!("Invalid GATEWAY_PORT environment variable: {}", e))
                })?;
            }
        }

        if let Ok(url) = std::env::var("DATA_API_URL") {
            if !url.is_empty() {
                self.catalog.default_base_url = url;
            }
        }

        // Resolve the completion API key from its configured environment variable
        if self.completion.api_key.is_none() {
            if let Some(env_name) = &self.completion.api_key_env {
                if let Ok(key) = std::env::var(env_name) {
                    if !key.is_empty() {
                        self.completion.api_key = Some(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(GatewayError::config("Server host cannot be empty"));
        }
        if self.server.port == 0 {
            return Err(GatewayError::config("Server port cannot be 0"));
        }
        if self.catalog.path.trim().is_empty() {
            return Err(GatewayError::config("Catalogue path cannot be empty"));
        }
        if self.completion.timeout == 0 {
            return Err(GatewayError::config("Completion timeout cannot be 0"));
        }
        match self.completion.provider.as_str() {
            "openai" | "openai-compatible" | "ollama" => {}
            other => {
                return Err(GatewayError::config(format!(
                    "Unsupported completion provider: {}",
                    other
                )));
            }
        }
        Ok(())
    }
}
