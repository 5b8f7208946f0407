//! Turn state machine
//!
//! One engine instance serves all sessions; the per-turn pipeline is
//! matching, correction merging, extraction, validation, entity resolution,
//! completeness check, invocation. Every path through a turn produces a
//! user-facing message and an updated conversation state; no path panics or
//! escapes as a process-level error.

use crate::catalog::{CatalogStore, EndpointDescriptor};
use crate::completion::CompletionClient;
use crate::invoker::EndpointInvoker;
use crate::orchestrator::corrections::merge_corrections;
use crate::orchestrator::extractor::extract_parameters;
use crate::orchestrator::matcher::match_endpoint;
use crate::orchestrator::missing::find_missing_params;
use crate::orchestrator::resolver::resolve_entity;
use crate::orchestrator::session::{ConversationState, Message};
use crate::orchestrator::validator::validate_parameters;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parameters whose values name an entity that must resolve against a
/// reference list before invocation
const ENTITY_PARAMS: [&str; 2] = ["portfolio_name", "benchmark_name"];

/// Outcome of one conversation turn
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// No endpoint could be identified; the user should rephrase
    Clarification { message: String },
    /// One or more parameter values violate their rules
    ValidationFailed {
        message: String,
        errors: HashMap<String, String>,
    },
    /// An entity name did not resolve; suggestions are offered
    UnknownEntity {
        message: String,
        parameter: String,
        suggestions: Vec<String>,
    },
    /// Entity resolution itself failed (fail-closed)
    ResolutionError { message: String },
    /// Required parameters are still missing
    MissingParams {
        message: String,
        missing: Vec<String>,
    },
    /// The endpoint call failed; state is preserved for retry
    InvocationFailed { message: String },
    /// The endpoint call succeeded; the session should be cleared
    Completed {
        message: String,
        result: serde_json::Value,
    },
}

impl TurnOutcome {
    /// The user-facing message for this outcome
    pub fn message(&self) -> &str {
        match self {
            TurnOutcome::Clarification { message }
            | TurnOutcome::ValidationFailed { message, .. }
            | TurnOutcome::UnknownEntity { message, .. }
            | TurnOutcome::ResolutionError { message }
            | TurnOutcome::MissingParams { message, .. }
            | TurnOutcome::InvocationFailed { message }
            | TurnOutcome::Completed { message, .. } => message,
        }
    }

    /// Whether the endpoint call completed successfully this turn
    pub fn is_completed(&self) -> bool {
        matches!(self, TurnOutcome::Completed { .. })
    }
}

/// The slot-filling orchestration engine
pub struct OrchestrationEngine {
    catalog: Arc<CatalogStore>,
    completion: Arc<dyn CompletionClient>,
    invoker: EndpointInvoker,
}

impl OrchestrationEngine {
    /// Create a new engine
    pub fn new(
        catalog: Arc<CatalogStore>,
        completion: Arc<dyn CompletionClient>,
        invoker: EndpointInvoker,
    ) -> Self {
        Self {
            catalog,
            completion,
            invoker,
        }
    }

    /// Process one user turn against a conversation state.
    ///
    /// The caller must hold exclusive access to the state for the duration of
    /// the turn; on a `Completed` outcome the caller discards the session so
    /// the next query starts a fresh slot-filling cycle.
    pub async fn run_turn(&self, query: &str, state: &mut ConversationState) -> TurnOutcome {
        debug!("Turn start, accumulated params: {:?}", state.params);
        state.history.push(Message::user(query));

        let catalog = self.catalog.current();

        // Identify the endpoint, falling back to the one already in play
        let endpoint = match_endpoint(query, &catalog).or_else(|| {
            state
                .current_endpoint
                .as_deref()
                .and_then(|name| catalog.endpoint(name))
        });

        let Some(endpoint) = endpoint else {
            let message =
                "❓ I couldn't identify which API to call. Please rephrase your request.".to_string();
            state.history.push(Message::assistant(message.clone()));
            return TurnOutcome::Clarification { message };
        };

        info!("Turn matched endpoint '{}'", endpoint.name);
        state.current_endpoint = Some(endpoint.name.clone());

        // Extraction and correction merging both feed the slot map
        let extracted = extract_parameters(query, endpoint, self.completion.as_ref()).await;
        state.params.extend(extracted);
        merge_corrections(query, &mut state.params, endpoint, self.completion.as_ref()).await;

        // Switching endpoints mid-conversation silently drops foreign slots
        state.params.retain(|key, _| endpoint.declares(key));

        let validation_errors =
            validate_parameters(&state.params, endpoint, self.completion.as_ref()).await;
        if !validation_errors.is_empty() {
            let error_lines = validation_errors
                .iter()
                .map(|(param, reason)| format!("• {}: {}", param, reason))
                .collect::<Vec<_>>()
                .join("\n");
            let message = format!(
                "Some parameters are invalid:\n{}\nPlease correct them.",
                error_lines
            );
            state.history.push(Message::assistant(message.clone()));
            return TurnOutcome::ValidationFailed {
                message,
                errors: validation_errors,
            };
        }

        if let Some(outcome) = self.resolve_entity_params(state, endpoint).await {
            state.history.push(Message::assistant(outcome.message().to_string()));
            return outcome;
        }

        let missing = find_missing_params(&state.params, endpoint);
        if !missing.is_empty() {
            let message = format!("I still need the following parameters: {}.", missing.join(", "));
            state.history.push(Message::assistant(message.clone()));
            return TurnOutcome::MissingParams { message, missing };
        }

        // All slots filled, validated, and resolved
        let result = self.invoker.invoke(endpoint, &state.params).await;
        if !result.success {
            let reason = result
                .error
                .unwrap_or_else(|| "unknown invocation failure".to_string());
            warn!("Invocation of '{}' failed: {}", endpoint.name, reason);
            let message = format!("❌ API call failed: {}", reason);
            state.history.push(Message::assistant(message.clone()));
            return TurnOutcome::InvocationFailed { message };
        }

        let data = result.data.unwrap_or(serde_json::Value::Null);
        let rendered =
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
        let message = format!("✅ {} result:\n{}", endpoint.name, rendered);
        state.history.push(Message::assistant(message.clone()));
        TurnOutcome::Completed {
            message,
            result: data,
        }
    }

    /// Resolve every entity-typed parameter present in the slot map.
    ///
    /// A match rewrites the slot to the canonical spelling; a miss or a
    /// resolution error halts the turn (fail-closed).
    async fn resolve_entity_params(
        &self,
        state: &mut ConversationState,
        endpoint: &EndpointDescriptor,
    ) -> Option<TurnOutcome> {
        let catalog = self.catalog.current();

        for param in ENTITY_PARAMS {
            let Some(candidate) = state.params.get(param).cloned() else {
                continue;
            };

            // "portfolio_name" resolves against the "portfolios" list
            let singular = param.strip_suffix("_name").unwrap_or(param);
            let category = format!("{}s", singular);
            let reference_names = catalog.reference_names(&category);

            match resolve_entity(&candidate, &category, reference_names, self.completion.as_ref())
                .await
            {
                Ok(resolution) if resolution.exists => {
                    if let Some(matched) = resolution.matched {
                        if matched != candidate {
                            debug!("Normalized {} '{}' to '{}'", param, candidate, matched);
                        }
                        state.params.insert(param.to_string(), matched);
                    }
                }
                Ok(resolution) => {
                    let message = if resolution.closest.is_empty() {
                        format!("I couldn't find a {} named \"{}\".", singular.replace('_', " "), candidate)
                    } else {
                        format!(
                            "I couldn't find a {} named \"{}\". Did you mean: {}?",
                            singular.replace('_', " "),
                            candidate,
                            resolution.closest.join(", ")
                        )
                    };
                    return Some(TurnOutcome::UnknownEntity {
                        message,
                        parameter: param.to_string(),
                        suggestions: resolution.closest,
                    });
                }
                Err(e) => {
                    warn!("Entity resolution for '{}' failed: {}", param, e);
                    let message = format!("❌ Could not verify {}: {}", singular.replace('_', " "), e);
                    return Some(TurnOutcome::ResolutionError { message });
                }
            }
        }

        None
    }
}
