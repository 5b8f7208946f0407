//! Catalogue types and structures

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default value for the method field
fn default_method() -> HttpMethod {
    HttpMethod::Post
}

/// HTTP method declared by an endpoint descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET", alias = "get")]
    Get,
    #[serde(rename = "POST", alias = "post")]
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// One parameter declared by an endpoint descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name (unique within the descriptor)
    pub name: String,
    /// Informational type label ("string", "date", ...)
    #[serde(rename = "type", default)]
    pub param_type: String,
    /// Whether the parameter must be present before invocation
    #[serde(default)]
    pub required: bool,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

/// One downstream analytics API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Endpoint name (unique identifier, e.g. "sharpe_ratio")
    pub name: String,
    /// Route path (e.g. "/analytics/sharpe")
    pub route: String,
    /// HTTP method for invocation
    #[serde(default = "default_method")]
    pub method: HttpMethod,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Declared parameters, in documentation order
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    /// Natural-language validation rules, keyed by parameter name
    #[serde(default)]
    pub validation_rules: HashMap<String, String>,
    /// Keywords used by the deterministic matcher
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Base URL override; falls back to the configured downstream host
    #[serde(default)]
    pub base_url: Option<String>,
}

impl EndpointDescriptor {
    /// Validate the descriptor after load
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GatewayError::catalog("Endpoint name cannot be empty"));
        }
        if self.route.trim().is_empty() {
            return Err(GatewayError::catalog(format!(
                "Endpoint '{}' has an empty route",
                self.name
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for param in &self.parameters {
            if param.name.trim().is_empty() {
                return Err(GatewayError::catalog(format!(
                    "Endpoint '{}' declares a parameter with an empty name",
                    self.name
                )));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(GatewayError::catalog(format!(
                    "Endpoint '{}' declares duplicate parameter '{}'",
                    self.name, param.name
                )));
            }
        }

        // Validation rules must refer to declared parameters
        for rule_param in self.validation_rules.keys() {
            if !seen.contains(rule_param.as_str()) {
                return Err(GatewayError::catalog(format!(
                    "Endpoint '{}' has a validation rule for undeclared parameter '{}'",
                    self.name, rule_param
                )));
            }
        }

        Ok(())
    }

    /// Check whether a parameter name is declared by this endpoint
    pub fn declares(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Names of all declared parameters, in declaration order
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Names of all required parameters, in declaration order
    pub fn required_parameter_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}
