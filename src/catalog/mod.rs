//! Endpoint catalogue for the FinPerf gateway
//!
//! The catalogue holds the endpoint descriptors produced by the offline
//! documentation pipeline, plus the reference entity-name lists used for
//! entity resolution. It is loaded once at startup and treated as immutable
//! between explicit reloads.

pub mod store;
pub mod types;

pub use store::{Catalog, CatalogStore};
pub use types::{EndpointDescriptor, HttpMethod, ParameterSpec};
