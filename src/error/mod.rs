//! Error handling module for the FinPerf gateway
//!
//! This module provides the error types and result alias used throughout the gateway.

mod error;

// Re-export the main error types and utilities
pub use error::{GatewayError, Result};
