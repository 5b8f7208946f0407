//! Deterministic endpoint matching
//!
//! No LLM involvement: the query is matched against endpoint names, routes,
//! and keyword hints. First match in catalogue order wins; there is no
//! scoring.

use crate::catalog::{Catalog, EndpointDescriptor};

/// Match a user query to an endpoint descriptor.
///
/// For each descriptor in catalogue order the query is tested against
/// (a) the name with underscores as spaces, or the route, as a substring,
/// then (b) any keyword as a substring. Returns `None` when nothing matches;
/// the engine then falls back to the conversation's current endpoint.
pub fn match_endpoint<'a>(query: &str, catalog: &'a Catalog) -> Option<&'a EndpointDescriptor> {
    let query = query.to_lowercase();

    catalog.endpoints().iter().find(|endpoint| {
        let name = endpoint.name.to_lowercase().replace('_', " ");
        let route = endpoint.route.to_lowercase();

        if query.contains(&name) || query.contains(&route) {
            return true;
        }

        endpoint
            .keywords
            .iter()
            .any(|kw| query.contains(&kw.to_lowercase()))
    })
}
