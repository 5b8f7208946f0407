//! Error types and handling for the FinPerf gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Catalogue errors (load, reload, lookup)
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// Completion capability errors (transport, provider, malformed response envelope)
    #[error("Completion error: {message}")]
    Completion { message: String },

    /// Entity resolution errors
    #[error("Resolution error: {message}")]
    Resolution { message: String },

    /// Endpoint invocation errors
    #[error("Invocation error: {endpoint}: {message}")]
    Invocation { endpoint: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a catalogue error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a completion capability error
    pub fn completion<S: Into<String>>(message: S) -> Self {
        Self::Completion {
            message: message.into(),
        }
    }

    /// Create an entity resolution error
    pub fn resolution<S: Into<String>>(message: S) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create an invocation error
    pub fn invocation<S: Into<String>>(endpoint: S, message: S) -> Self {
        Self::Invocation {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error (using completion error type)
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Completion {
            message: format!("Timeout: {}", message.into()),
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            GatewayError::Config { .. } => "config",
            GatewayError::Catalog { .. } => "catalog",
            GatewayError::Completion { .. } => "completion",
            GatewayError::Resolution { .. } => "resolution",
            GatewayError::Invocation { .. } => "invocation",
            GatewayError::Io(_) => "io",
            GatewayError::Serde(_) => "serialization",
            GatewayError::Yaml(_) => "yaml",
            GatewayError::Http(_) => "http",
            GatewayError::Internal(_) => "internal",
        }
    }
}
