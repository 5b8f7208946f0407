//! Robust JSON extraction from completion output
//!
//! Completion output is expected to be JSON, but models routinely wrap it in
//! Markdown code fences or emit prose instead. Every call site that parses
//! completion output goes through this module; whether a `None` is treated as
//! "nothing extracted" (fail-open) or a hard error (fail-closed) is decided
//! at the call site, not here.

use serde_json::{Map, Value};

/// Strip Markdown code fences (``` / ```json) from a completion response
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_prefix
        .strip_suffix("```")
        .unwrap_or(without_prefix)
        .trim()
}

/// Parse completion output into a JSON value, tolerating code fences.
/// Returns `None` on any parse failure.
pub fn extract_json_value(text: &str) -> Option<Value> {
    serde_json::from_str(strip_code_fences(text)).ok()
}

/// Parse completion output into a JSON object, tolerating code fences.
/// Returns `None` on parse failure or when the value is not an object.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    match extract_json_value(text)? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
