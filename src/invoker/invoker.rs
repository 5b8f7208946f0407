//! HTTP invoker for catalogue endpoints

use crate::catalog::{EndpointDescriptor, HttpMethod};
use crate::error::{GatewayError, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

/// Normalized result of one endpoint invocation.
///
/// Transport failures, timeouts, and non-2xx statuses are all captured here
/// rather than propagated; the engine treats them uniformly as recoverable
/// per-turn failures.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    /// Whether the call returned a 2xx status
    pub success: bool,
    /// Response payload (JSON when the body parses, raw text otherwise)
    pub data: Option<Value>,
    /// Error description when not successful
    pub error: Option<String>,
}

impl InvocationResult {
    fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP invoker for downstream analytics endpoints
pub struct EndpointInvoker {
    client: Client,
    default_base_url: String,
    timeout: Duration,
}

impl EndpointInvoker {
    /// Create a new invoker
    pub fn new(default_base_url: String, timeout_secs: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| {
                GatewayError::invocation("invoker".to_string(), format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            default_base_url,
            timeout,
        })
    }

    /// Invoke an endpoint with a fully-resolved, fully-validated parameter set.
    ///
    /// GET sends the parameters as a query string; POST sends them as a JSON
    /// body, per the descriptor's declared method.
    pub async fn invoke(
        &self,
        endpoint: &EndpointDescriptor,
        params: &HashMap<String, String>,
    ) -> InvocationResult {
        let base_url = endpoint
            .base_url
            .as_deref()
            .unwrap_or(&self.default_base_url);
        let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint.route);

        debug!("Invoking {} {} for '{}'", endpoint.method, url, endpoint.name);

        let request = match endpoint.method {
            HttpMethod::Get => self.client.get(&url).query(params),
            HttpMethod::Post => self.client.post(&url).json(&json!(params)),
        };

        let response = match tokio_timeout(self.timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return InvocationResult::failure(format!("Request failed: {}", e)),
            Err(_) => {
                return InvocationResult::failure(format!(
                    "Request timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return InvocationResult::failure(format!("Failed to read response body: {}", e)),
        };

        let data = serde_json::from_str::<Value>(&body)
            .ok()
            .or_else(|| (!body.is_empty()).then(|| Value::String(body)));

        if status.is_success() {
            InvocationResult {
                success: true,
                data,
                error: None,
            }
        } else {
            InvocationResult {
                success: false,
                data,
                error: Some(format!("Request failed with status: {}", status)),
            }
        }
    }
}
