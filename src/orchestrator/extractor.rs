//! LLM-backed parameter extraction
//!
//! One completion call per turn asks for a JSON object keyed by exactly the
//! endpoint's declared parameter names, with the literal string "null" for
//! absent values. Extraction is fail-open: any malformed output yields an
//! empty mapping, never a user-visible error.

use crate::catalog::EndpointDescriptor;
use crate::completion::CompletionClient;
use crate::utils::json::extract_json_object;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Extract parameter values for an endpoint from a user query.
///
/// Returns only declared, non-null entries. Endpoints without parameters
/// never trigger a completion call.
pub async fn extract_parameters(
    query: &str,
    endpoint: &EndpointDescriptor,
    completion: &dyn CompletionClient,
) -> HashMap<String, String> {
    if endpoint.parameters.is_empty() {
        return HashMap::new();
    }

    let prompt = build_extraction_prompt(query, endpoint);

    let response = match completion.complete("", &prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Parameter extraction completion failed: {}", e);
            return HashMap::new();
        }
    };

    let Some(object) = extract_json_object(&response) else {
        debug!("Parameter extraction returned non-JSON output, treating as empty");
        return HashMap::new();
    };

    let mut params = HashMap::new();
    for (key, value) in object {
        if !endpoint.declares(&key) {
            debug!("Dropping extracted value for undeclared parameter '{}'", key);
            continue;
        }
        if let Some(text) = value_to_slot(&value) {
            params.insert(key, text);
        }
    }

    debug!("Extracted {} parameter(s) for '{}'", params.len(), endpoint.name);
    params
}

/// Convert an extracted JSON value to a slot string, dropping null markers
pub(crate) fn value_to_slot(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        return None;
    }
    Some(text)
}

fn build_extraction_prompt(query: &str, endpoint: &EndpointDescriptor) -> String {
    let param_names = endpoint.parameter_names().join(", ");
    let shape = endpoint
        .parameters
        .iter()
        .map(|p| format!("\"{}\": \"value or null\"", p.name))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an information extraction model.

Extract the following parameters from the user's request.
If a parameter is not mentioned, set its value to null.

Parameters: {param_names}

User query: "{query}"

Respond with valid JSON only:
{{ {shape} }}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_slot_drops_nulls() {
        assert_eq!(value_to_slot(&Value::Null), None);
        assert_eq!(value_to_slot(&json!("null")), None);
        assert_eq!(value_to_slot(&json!("NULL")), None);
        assert_eq!(value_to_slot(&json!("")), None);
    }

    #[test]
    fn test_value_to_slot_keeps_values() {
        assert_eq!(value_to_slot(&json!("1Y")), Some("1Y".to_string()));
        assert_eq!(value_to_slot(&json!(42)), Some("42".to_string()));
        assert_eq!(value_to_slot(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_extraction_prompt_lists_declared_parameters() {
        let endpoint: EndpointDescriptor = serde_json::from_value(json!({
            "name": "sharpe_ratio",
            "route": "/analytics/sharpe",
            "parameters": [
                {"name": "portfolio_name", "required": true},
                {"name": "period", "required": true}
            ]
        }))
        .unwrap();

        let prompt = build_extraction_prompt("compute sharpe", &endpoint);
        assert!(prompt.contains("portfolio_name, period"));
        assert!(prompt.contains("\"period\": \"value or null\""));
    }
}
