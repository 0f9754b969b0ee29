//! WexBloit Config Domain - Core configuration types
//!
//! This crate defines the test-configuration document model together with
//! the pure parts of the configuration pipeline: validation, normalization
//! to the canonical form, and the bundled templates.
//! All types here are pure Rust with no I/O dependencies.

pub mod canonical;
pub mod catalog;
pub mod document;
pub mod error;
pub mod normalize;
pub mod templates;
pub mod validation;

pub use canonical::CanonicalDocument;
pub use catalog::{EXTENSIONS, MODULES, ModuleCategory, ModuleInfo, Severity};
pub use document::{
    ConfigurationDocument, Execution, ExpectedStatus, Extensions, Flow, NetworkConfig, Output,
    OutputFormat, Project, ProxyConfig, ProxyEndpoint, ProxyScheme, RequestModifications,
    SslConfig, Step, TestCase, TestCaseModules, Tests, ValidationRule, ValidationTarget,
    ValidationType,
};
pub use error::{DomainError, DomainResult, SerializationError};
pub use normalize::normalize;
pub use templates::{TemplateId, TemplateInfo, template};
pub use validation::{Violation, validate, violations};
