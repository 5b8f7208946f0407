//! HTTP completion client for OpenAI-compatible and Ollama providers

use crate::config::CompletionConfig;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

/// Text-completion boundary used for extraction, validation, correction
/// parsing, and entity resolution
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue one completion request and return the raw model output
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// OpenAI chat-completions request structure
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: Option<u32>,
}

/// Chat message structure
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat-completions response structure
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Completion client backed by an HTTP LLM provider
pub struct HttpCompletionClient {
    config: CompletionConfig,
    client: Client,
}

impl HttpCompletionClient {
    /// Create a new client from configuration
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .use_rustls_tls()
            .build()
            .map_err(|e| GatewayError::completion(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Call an OpenAI-compatible chat-completions API
    async fn call_openai(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| GatewayError::completion("API key required for OpenAI provider"))?;

        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        let mut messages = Vec::new();
        if !system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user_prompt.to_string(),
        });

        let request_body = ChatRequest {
            model: self.config.model.clone(),
            messages,
            // Low temperature for consistent extraction
            temperature: 0.1,
            max_tokens: Some(1000),
        };

        let url = format!("{}/chat/completions", base_url);
        debug!("Calling completion provider at: {}", url);

        let response = tokio_timeout(
            Duration::from_secs(self.config.timeout),
            self.client
                .post(&url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&request_body)
                .send(),
        )
        .await
        .map_err(|_| GatewayError::timeout("completion request"))?
        .map_err(|e| GatewayError::completion(format!("Completion request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GatewayError::completion(format!("Failed to read completion response: {}", e)))?;

        if !status.is_success() {
            return Err(GatewayError::completion(format!(
                "Completion request failed with status {}: {}",
                status, response_text
            )));
        }

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| GatewayError::completion(format!("Failed to parse completion response: {}", e)))?;

        let content = chat_response
            .choices
            .first()
            .ok_or_else(|| GatewayError::completion("No choices in completion response"))?
            .message
            .content
            .clone();

        debug!("Completion response: {}", content);
        Ok(content)
    }

    /// Call an Ollama generate API
    async fn call_ollama(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        let request_body = json!({
            "model": self.config.model,
            "system": system_prompt,
            "prompt": user_prompt,
            "stream": false,
            "options": {
                "temperature": 0.1,
                "num_predict": 1000
            }
        });

        let url = format!("{}/api/generate", base_url);
        debug!("Calling completion provider at: {}", url);

        let response = tokio_timeout(
            Duration::from_secs(self.config.timeout),
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&request_body)
                .send(),
        )
        .await
        .map_err(|_| GatewayError::timeout("completion request"))?
        .map_err(|e| GatewayError::completion(format!("Completion request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GatewayError::completion(format!("Failed to read completion response: {}", e)))?;

        if !status.is_success() {
            return Err(GatewayError::completion(format!(
                "Completion request failed with status {}: {}",
                status, response_text
            )));
        }

        let ollama_response: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| GatewayError::completion(format!("Failed to parse completion response: {}", e)))?;

        let content = ollama_response["response"]
            .as_str()
            .ok_or_else(|| GatewayError::completion("No response field in Ollama response"))?
            .to_string();

        debug!("Completion response: {}", content);
        Ok(content)
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        match self.config.provider.as_str() {
            "openai" | "openai-compatible" => self.call_openai(system_prompt, user_prompt).await,
            "ollama" => self.call_ollama(system_prompt, user_prompt).await,
            other => Err(GatewayError::completion(format!(
                "Unsupported completion provider: {}",
                other
            ))),
        }
    }
}
