//! Shared utilities

pub mod json;

pub use json::{extract_json_object, extract_json_value};
