//! Text formats for configuration documents.
//!
//! - YAML: block-style emitter for generated configuration files
//! - JSON: stable pretty-printing for working documents

mod json;
mod yaml;

pub use json::*;
pub use yaml::*;
