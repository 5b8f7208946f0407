//! Completion capability adapter
//!
//! The orchestration core treats text completion as an opaque boundary:
//! `complete(system_prompt, user_prompt) -> text`. This module provides the
//! trait and an HTTP client speaking OpenAI-compatible and Ollama APIs.

pub mod client;

pub use client::{CompletionClient, HttpCompletionClient};
