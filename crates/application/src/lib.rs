//! WexBloit Config Application - Pipeline facade and ports
//!
//! This crate wires the pure domain steps into the configuration pipeline
//! and defines the ports implemented by the infrastructure layer.

pub mod error;
pub mod pipeline;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use pipeline::{ConfigPipeline, GeneratedConfig, suggested_filename};
pub use ports::{ConfigSerializer, ProbeOutcome, ProxyProbe};
pub use use_cases::{DEFAULT_PROBE_TIMEOUT, ProbeProxies, ProbeReport};
