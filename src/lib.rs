//! FinPerf gateway - conversational front-end for the FinPerf analytics APIs
//!
//! This crate maps free-text user requests onto a catalogue of downstream
//! analytics API endpoints, fills in required parameters across turns,
//! validates them, resolves entity names against reference lists, and
//! invokes the resolved endpoint.

pub mod catalog;
pub mod completion;
pub mod config;
pub mod error;
pub mod invoker;
pub mod orchestrator;
pub mod utils;
pub mod web;

pub use config::Config;
pub use error::{GatewayError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 8001;
