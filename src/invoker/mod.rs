//! Endpoint invocation
//!
//! Performs the downstream analytics API call for a fully-resolved parameter
//! set and normalizes its result or error.

mod invoker;

pub use invoker::{EndpointInvoker, InvocationResult};
