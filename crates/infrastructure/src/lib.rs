//! WexBloit Config Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus document file handling.

pub mod adapters;
pub mod persistence;
pub mod serialization;

pub use adapters::TcpProxyProbe;
pub use persistence::{DocumentFormat, DocumentIoError, DocumentStore};
pub use serialization::{
    DEFAULT_LINE_WIDTH, JsonError, YAML_MEDIA_TYPE, YamlSerializer, from_json, to_json_stable,
    to_yaml, value_to_yaml,
};
