//! Entity-name resolution against the catalogue's reference lists
//!
//! A candidate name must resolve to a canonical reference spelling before
//! invocation. Unlike extraction and validation, resolution is fail-closed:
//! a transport or parse failure is a hard error for this check, because an
//! unresolved entity name must never silently proceed to invocation.

use crate::completion::CompletionClient;
use crate::error::{GatewayError, Result};
use crate::utils::json::extract_json_object;
use tracing::debug;

/// Outcome of resolving one candidate name
#[derive(Debug, Clone, PartialEq)]
pub struct EntityResolution {
    /// Whether an exact (case-insensitive) match exists
    pub exists: bool,
    /// Canonical spelling of the matched name
    pub matched: Option<String>,
    /// Up to 3 closest alternatives when there is no match
    pub closest: Vec<String>,
}

impl EntityResolution {
    fn miss(closest: Vec<String>) -> Self {
        Self {
            exists: false,
            matched: None,
            closest,
        }
    }
}

/// Resolve a candidate name against a category's reference list.
///
/// An empty reference list short-circuits to a miss without a completion
/// call. Otherwise one completion request asks for a case-insensitive exact
/// match plus up to 3 closest alternatives.
pub async fn resolve_entity(
    candidate: &str,
    category: &str,
    reference_names: &[String],
    completion: &dyn CompletionClient,
) -> Result<EntityResolution> {
    if reference_names.is_empty() {
        debug!("No reference names for category '{}', skipping resolution", category);
        return Ok(EntityResolution::miss(Vec::new()));
    }

    let prompt = build_resolution_prompt(candidate, category, reference_names);

    let response = completion
        .complete("", &prompt)
        .await
        .map_err(|e| GatewayError::resolution(format!("Entity resolution failed: {}", e)))?;

    let object = extract_json_object(&response).ok_or_else(|| {
        GatewayError::resolution(format!(
            "Entity resolution for '{}' returned malformed output",
            candidate
        ))
    })?;

    let exists = object
        .get("exists")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let matched = object
        .get("matched")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let mut closest: Vec<String> = object
        .get("closest")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    closest.truncate(3);

    if exists && matched.is_none() {
        return Err(GatewayError::resolution(format!(
            "Entity resolution for '{}' reported a match without a name",
            candidate
        )));
    }

    Ok(EntityResolution {
        exists,
        matched,
        closest,
    })
}

fn build_resolution_prompt(candidate: &str, category: &str, reference_names: &[String]) -> String {
    let listing = reference_names.join(", ");

    format!(
        r#"You match a candidate name against a list of known {category}.

Candidate: "{candidate}"
Known {category}: {listing}

A match means the candidate equals a known name ignoring letter case.
If there is a match, return its exact spelling from the list.
If not, return up to 3 closest names from the list.

Respond ONLY in valid JSON:
{{"exists": true or false, "matched": "exact name or null", "closest": ["up to 3 names"]}}"#
    )
}
