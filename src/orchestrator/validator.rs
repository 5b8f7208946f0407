//! LLM-backed parameter validation
//!
//! Endpoints may carry natural-language validation rules. All current values
//! and all applicable rules go out in a single completion call; only entries
//! in the returned `validation_errors` object count as violations. Validation
//! is fail-open: a broken completion pipeline never blocks progress, so this
//! is a best-effort check, not a safety guarantee. Missing parameters are a
//! separate concern and are never evaluated here.

use crate::catalog::EndpointDescriptor;
use crate::completion::CompletionClient;
use crate::utils::json::extract_json_object;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Validate the current parameter values against the endpoint's rules.
///
/// Returns a mapping from parameter name to violation reason. Empty means
/// "currently valid", not "complete". Endpoints without rules, and turns
/// where no ruled parameter is present yet, return empty without a
/// completion call.
pub async fn validate_parameters(
    params: &HashMap<String, String>,
    endpoint: &EndpointDescriptor,
    completion: &dyn CompletionClient,
) -> HashMap<String, String> {
    if endpoint.validation_rules.is_empty() {
        return HashMap::new();
    }

    let applicable: Vec<(&str, &str, &str)> = endpoint
        .parameters
        .iter()
        .filter_map(|spec| {
            let rule = endpoint.validation_rules.get(&spec.name)?;
            let value = params.get(&spec.name)?;
            Some((spec.name.as_str(), value.as_str(), rule.as_str()))
        })
        .collect();

    if applicable.is_empty() {
        return HashMap::new();
    }

    let prompt = build_validation_prompt(&applicable);

    let response = match completion.complete("", &prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Validation completion failed, treating as no errors: {}", e);
            return HashMap::new();
        }
    };

    let Some(object) = extract_json_object(&response) else {
        debug!("Validation returned non-JSON output, treating as no errors");
        return HashMap::new();
    };

    let mut errors = HashMap::new();
    if let Some(violations) = object.get("validation_errors").and_then(|v| v.as_object()) {
        for (param, reason) in violations {
            // Only parameters we actually submitted can be in violation
            if !applicable.iter().any(|(name, _, _)| *name == param.as_str()) {
                continue;
            }
            let reason = reason
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| reason.to_string());
            errors.insert(param.clone(), reason);
        }
    }

    errors
}

fn build_validation_prompt(applicable: &[(&str, &str, &str)]) -> String {
    let listing = applicable
        .iter()
        .map(|(name, value, rule)| format!("- {name}: value \"{value}\", rule: {rule}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a validation agent. Check whether each parameter value obeys its rule.
Check only format and content, not whether values exist in any database.

Parameters:
{listing}

Respond ONLY in valid JSON, listing just the violations:
{{"validation_errors": {{"param_name": "brief reason"}}}}

If every value obeys its rule, respond: {{"validation_errors": {{}}}}"#
    )
}
