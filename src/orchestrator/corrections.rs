//! Best-effort correction merging
//!
//! A user fixing an earlier slot can write `key=value` tokens directly, or
//! phrase the correction in natural language. The deterministic pass runs
//! first; the completion fallback is only consulted when no `key=value`
//! token was found at all. Corrections never raise.

use crate::catalog::EndpointDescriptor;
use crate::completion::CompletionClient;
use crate::orchestrator::extractor::value_to_slot;
use crate::utils::json::extract_json_object;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static CORRECTION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*=\s*([\w\-]+)").expect("correction token regex"));

/// Merge corrections from free text into the accumulated slot values.
///
/// Keys not declared by the endpoint are ignored, which keeps unrelated
/// `key=value` text from injecting parameters.
pub async fn merge_corrections(
    user_text: &str,
    params: &mut HashMap<String, String>,
    endpoint: &EndpointDescriptor,
    completion: &dyn CompletionClient,
) {
    let mut token_seen = false;
    for capture in CORRECTION_TOKEN.captures_iter(user_text) {
        token_seen = true;
        let key = &capture[1];
        let value = &capture[2];
        if endpoint.declares(key) {
            debug!("Applying correction {}={}", key, value);
            params.insert(key.to_string(), value.to_string());
        } else {
            debug!("Ignoring correction for undeclared parameter '{}'", key);
        }
    }

    if token_seen {
        return;
    }

    // Natural-language correction, e.g. "the start date is 2023-01-01"
    let prompt = format!(
        r#"Extract a parameter name and value from: "{user_text}"
Output JSON: {{"param": "name", "value": "..."}} or null."#
    );

    let response = match completion.complete("", &prompt).await {
        Ok(text) => text,
        Err(e) => {
            debug!("Correction completion failed, ignoring: {}", e);
            return;
        }
    };

    let Some(object) = extract_json_object(&response) else {
        return;
    };

    let (Some(param), Some(value)) = (
        object.get("param").and_then(|v| v.as_str()),
        object.get("value").and_then(value_to_slot),
    ) else {
        return;
    };

    if endpoint.declares(param) {
        debug!("Applying natural-language correction {}={}", param, value);
        params.insert(param.to_string(), value);
    }
}
