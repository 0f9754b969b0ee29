//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the configuration pipeline and the
//! collaborators that are not pure functions of the document.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod proxy_probe;
mod serializer;

pub use proxy_probe::{ProbeOutcome, ProxyProbe};
pub use serializer::ConfigSerializer;
