//! Configuration management for the FinPerf gateway

mod config;

pub use config::{CatalogConfig, CompletionConfig, Config, LoggingConfig, ServerConfig};
