//! Missing required-parameter detection
//!
//! Pure and deterministic; no LLM involvement.

use crate::catalog::EndpointDescriptor;
use std::collections::HashMap;

/// Required parameter names not yet present in `params`, in the endpoint's
/// declared parameter order.
pub fn find_missing_params(
    params: &HashMap<String, String>,
    endpoint: &EndpointDescriptor,
) -> Vec<String> {
    endpoint
        .parameters
        .iter()
        .filter(|spec| spec.required && !params.contains_key(&spec.name))
        .map(|spec| spec.name.clone())
        .collect()
}
